//! HTTP API のリクエスト DTO

use serde::Deserialize;

/// サーバ発の全体送信・アナウンス用リクエスト
#[derive(Debug, Deserialize)]
pub struct ServerTextRequest {
    pub text: String,
}

/// サーバ発の個別送信用リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateMessageRequest {
    pub display_name: String,
    pub text: String,
}
