//! エンティティ定義

use serde::Serialize;

use super::value_object::{Author, DisplayName, MessageText, Timestamp};

/// チャットストリームに流れる 1 件のイベント
///
/// 参加者のメッセージ、またはサーバ発のシステムイベント。
/// 作成後は不変。履歴には挿入順（= 時系列順）で並ぶ。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEvent {
    /// 発言者ラベル（参加者の表示名、または予約ラベル）
    pub author: Author,
    /// 本文
    pub text: MessageText,
    /// 作成時刻（Unix ミリ秒、UTC）
    pub timestamp: Timestamp,
    /// サーバ発イベントなら true
    pub is_system: bool,
}

impl ChatEvent {
    /// 参加者のメッセージイベントを作成
    pub fn user(name: &DisplayName, text: MessageText, timestamp: Timestamp) -> Self {
        Self {
            author: Author::participant(name),
            text,
            timestamp,
            is_system: false,
        }
    }

    /// サーバ発のシステムイベントを作成
    pub fn system(author: Author, text: MessageText, timestamp: Timestamp) -> Self {
        Self {
            author,
            text,
            timestamp,
            is_system: true,
        }
    }
}
