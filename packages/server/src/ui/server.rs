//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::infrastructure::broadcaster::WebSocketBroadcaster;
use crate::usecase::ChatCoordinator;

use super::{
    handler::{
        http::{
            get_messages, get_users, health_check, post_announce, post_broadcast, post_private,
            post_user_count,
        },
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Group chat server
///
/// This struct encapsulates the server configuration and provides methods to
/// run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(coordinator, broadcaster);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// ChatCoordinator（チャット全体のオーケストレーション）
    coordinator: Arc<ChatCoordinator>,
    /// WebSocketBroadcaster（セッションのチャンネル登録と配信）
    broadcaster: Arc<WebSocketBroadcaster>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(coordinator: Arc<ChatCoordinator>, broadcaster: Arc<WebSocketBroadcaster>) -> Self {
        Self {
            coordinator,
            broadcaster,
        }
    }

    /// Build the router with all WebSocket and HTTP endpoints
    ///
    /// Exposed separately from [`Server::run`] so tests can serve the same
    /// router on an ephemeral listener.
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            coordinator: self.coordinator.clone(),
            broadcaster: self.broadcaster.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/messages", get(get_messages))
            .route("/api/users", get(get_users))
            .route("/api/server/broadcast", post(post_broadcast))
            .route("/api/server/announce", post(post_announce))
            .route("/api/server/private", post(post_private))
            .route("/api/server/user-count", post(post_user_count))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the group chat server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Group chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
