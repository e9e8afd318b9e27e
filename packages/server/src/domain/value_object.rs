//! 値オブジェクト定義
//!
//! ドメインモデルの最小単位。いずれも構築時に検証を行い、
//! 以降は不変として扱います。

use serde::Serialize;
use uuid::Uuid;

use super::error::DomainError;

/// トランスポートセッションを一意に識別する不透明な ID
///
/// 1 つのライブセッションにつき 1 つ。中身の形式には意味を持たせない
/// （トランスポート層が採番する）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// 新しい ConnectionId を作成
    ///
    /// # Errors
    ///
    /// 空文字列の場合は `DomainError::EmptyConnectionId` を返す
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ConnectionId の採番
///
/// トランスポート層がセッション受付時に使う。採番された ID は
/// プロセス内で実用上一意（UUID v4）。
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// ランダムな ConnectionId を生成
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// 参加者の表示名
///
/// 一意ではない。同一人物が複数の接続で同じ表示名を持ち得る。
/// 呼び出し元が表示名を提供しなかった場合はセンチネル値
/// `"User Unknown"` を使う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DisplayName(String);

/// 表示名が提供されなかった場合のセンチネル
const UNKNOWN_DISPLAY_NAME: &str = "User Unknown";

impl DisplayName {
    /// 新しい DisplayName を作成
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// 表示名未提供時のセンチネル値
    pub fn unknown() -> Self {
        Self(UNKNOWN_DISPLAY_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for DisplayName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// チャットイベントの本文
///
/// トリム後に空でないことを構築時に保証する。保持するのは元の文字列
/// （トリムはしない）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageText(String);

impl MessageText {
    /// 新しい MessageText を作成
    ///
    /// # Errors
    ///
    /// トリム後に空の場合は `DomainError::EmptyMessageText` を返す
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::EmptyMessageText);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// チャットイベントの発言者ラベル
///
/// 参加者の表示名、またはサーバ発イベント用の予約ラベルのいずれか。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author(String);

impl Author {
    /// 参加者（人間）の発言者ラベル
    pub fn participant(name: &DisplayName) -> Self {
        Self(name.as_str().to_string())
    }

    /// サーバ全体送信の予約ラベル
    pub fn server() -> Self {
        Self("Server".to_string())
    }

    /// サーバ個別送信の予約ラベル
    pub fn server_private() -> Self {
        Self("Server (private)".to_string())
    }

    /// アナウンス専用の予約ラベル
    pub fn speaker() -> Self {
        Self("Speaker".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix タイムスタンプ（UTC、ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
