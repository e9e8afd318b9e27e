//! 配信ポートの trait 定義
//!
//! コーディネータが必要とする配信能力（全員宛 / 単一セッション宛 /
//! トリガ元宛）のインターフェース。トランスポート層（Infrastructure）が
//! 実装を提供します（依存性の逆転）。
//!
//! ## 配信保証
//!
//! - 同一ターゲットに対しては、発行順に届く（途中での並べ替えはない）
//! - 異なるターゲット間の順序は保証しない
//! - 配信の完了をコーディネータは待たない（発行したら戻る）

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::entity::ChatEvent;
use super::value_object::{ConnectionId, DisplayName};

/// クライアントへ送出するワイヤイベント
///
/// variant 名がそのままワイヤ上のイベント名になる。既存クライアントとの
/// 互換性のため、名前とペイロード形状は変更しないこと。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum OutboundEvent {
    /// 接続直後、トリガ元にのみ送る履歴スナップショット
    LoadRecentMessages(Vec<ChatEvent>),
    /// 参加通知（全員宛）
    UserJoined(DisplayName),
    /// 退出通知（全員宛）
    UserLeft(DisplayName),
    /// 重複を除いた表示名リストの更新（全員宛）
    UpdateUserList(Vec<DisplayName>),
    /// チャットイベント 1 件（全員宛または単一セッション宛）
    ReceiveMessage(ChatEvent),
    /// 重複を除いた参加者数の更新（全員宛）
    UpdateUserCount(usize),
}

/// 配信失敗
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// 宛先セッションが存在しない
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// 送出そのものに失敗した
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// 配信ポート trait
///
/// コーディネータはこの trait 経由でのみイベントを送出する。
/// 配信失敗は呼び出し側で吸収し、コーディネータの状態には影響させない。
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// 接続中の全セッションに配信する（ベストエフォート）
    async fn to_all(&self, event: OutboundEvent) -> Result<(), BroadcastError>;

    /// 指定セッションにのみ配信する
    ///
    /// セッションが既に存在しない場合、配信は黙って破棄される。
    async fn to_one(
        &self,
        target: &ConnectionId,
        event: OutboundEvent,
    ) -> Result<(), BroadcastError>;

    /// 現在のイベントのトリガ元セッションにのみ配信する
    async fn to_caller(
        &self,
        caller: &ConnectionId,
        event: OutboundEvent,
    ) -> Result<(), BroadcastError>;
}
