//! WebSocket の受信フレーム DTO

use serde::Deserialize;

/// クライアントから届くチャット入力フレーム
///
/// `{"text": "..."}` の形。JSON として解釈できないフレームは
/// UI 層でフレーム全体を本文として扱う（フォールバック）。
#[derive(Debug, Deserialize)]
pub struct ClientFrame {
    pub text: String,
}
