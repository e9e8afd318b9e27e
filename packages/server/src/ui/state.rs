//! Server state and connection management.

use std::sync::Arc;

use crate::infrastructure::broadcaster::WebSocketBroadcaster;
use crate::usecase::ChatCoordinator;

/// Shared application state
pub struct AppState {
    /// ChatCoordinator（チャット全体のオーケストレーション）
    pub coordinator: Arc<ChatCoordinator>,
    /// WebSocketBroadcaster（セッションのチャンネル登録と配信）
    pub broadcaster: Arc<WebSocketBroadcaster>,
}
