//! ドメイン層のエラー定義

use thiserror::Error;

/// 値オブジェクト構築時の検証エラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 接続 ID が空文字列
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    /// メッセージ本文がトリム後に空
    #[error("message text must not be empty or whitespace only")]
    EmptyMessageText,
}
