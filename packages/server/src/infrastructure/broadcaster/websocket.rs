//! WebSocket を使った Broadcaster 実装
//!
//! ## 責務
//!
//! - 接続中セッションの `UnboundedSender` を管理（register / unregister）
//! - ワイヤイベントの直列化とセッションへの送出（to_all / to_one / to_caller）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、イベント送出に使用します。
//!
//! これにより、「WebSocket の生成」と「イベントの送出」が分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成と登録
//! - Infrastructure 層: sender の管理、イベント送出
//!
//! register / unregister は trait ではなくこの型の固有メソッドです。
//! コーディネータが必要とするのは配信能力だけで、チャンネル登録は
//! トランスポートの都合だからです。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::domain::{BroadcastError, Broadcaster, ConnectionId, OutboundEvent};

/// セッションへの送出チャンネル
pub type ClientChannel = mpsc::UnboundedSender<String>;

/// WebSocket を使った Broadcaster 実装
///
/// ## フィールド
///
/// - `clients`: 接続中のセッションと対応する WebSocket sender のマップ
pub struct WebSocketBroadcaster {
    clients: Mutex<HashMap<ConnectionId, ClientChannel>>,
}

impl WebSocketBroadcaster {
    /// 新しい WebSocketBroadcaster を作成
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// セッションの送出チャンネルを登録
    pub async fn register(&self, connection_id: ConnectionId, sender: ClientChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Session '{}' registered to broadcaster", connection_id.as_str());
        clients.insert(connection_id, sender);
    }

    /// セッションの送出チャンネルを登録解除
    pub async fn unregister(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Session '{}' unregistered from broadcaster",
            connection_id.as_str()
        );
    }

    fn serialize(event: &OutboundEvent) -> Result<String, BroadcastError> {
        serde_json::to_string(event).map_err(|e| BroadcastError::PushFailed(e.to_string()))
    }
}

impl Default for WebSocketBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Broadcaster for WebSocketBroadcaster {
    async fn to_all(&self, event: OutboundEvent) -> Result<(), BroadcastError> {
        let payload = Self::serialize(&event)?;
        let clients = self.clients.lock().await;

        for (connection_id, sender) in clients.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(payload.clone()) {
                tracing::warn!(
                    "Failed to push event to session '{}': {}",
                    connection_id.as_str(),
                    e
                );
            } else {
                tracing::debug!("Broadcasted event to session '{}'", connection_id.as_str());
            }
        }

        Ok(())
    }

    async fn to_one(
        &self,
        target: &ConnectionId,
        event: OutboundEvent,
    ) -> Result<(), BroadcastError> {
        let payload = Self::serialize(&event)?;
        let clients = self.clients.lock().await;

        match clients.get(target) {
            Some(sender) => {
                sender
                    .send(payload)
                    .map_err(|e| BroadcastError::PushFailed(e.to_string()))?;
                tracing::debug!("Pushed event to session '{}'", target.as_str());
                Ok(())
            }
            None => {
                // 宛先が既に消えている配信は黙って破棄する
                tracing::debug!(
                    "Session '{}' not found, dropping delivery",
                    target.as_str()
                );
                Ok(())
            }
        }
    }

    async fn to_caller(
        &self,
        caller: &ConnectionId,
        event: OutboundEvent,
    ) -> Result<(), BroadcastError> {
        // このトランスポートではトリガ元も名前付きセッションの 1 つ
        self.to_one(caller, event).await
    }
}
