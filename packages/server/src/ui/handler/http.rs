//! HTTP API endpoint handlers.
//!
//! The `/api/server/*` routes expose the server-originated actions to the
//! hosting application; the expected no-op cases (empty text, unknown
//! recipient) still answer 204.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::{
    domain::{ChatEvent, DisplayName},
    infrastructure::dto::http::{PrivateMessageRequest, ServerTextRequest},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the current message history snapshot
pub async fn get_messages(State(state): State<Arc<AppState>>) -> Json<Vec<ChatEvent>> {
    Json(state.coordinator.snapshot().await)
}

/// Get the de-duplicated display names of connected participants
pub async fn get_users(State(state): State<Arc<AppState>>) -> Json<Vec<DisplayName>> {
    Json(state.coordinator.names().await)
}

/// Send a server message to all connected sessions
pub async fn post_broadcast(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ServerTextRequest>,
) -> StatusCode {
    state.coordinator.send_to_all(request.text).await;
    StatusCode::NO_CONTENT
}

/// Send a server announcement to all connected sessions
pub async fn post_announce(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ServerTextRequest>,
) -> StatusCode {
    state.coordinator.announce(request.text).await;
    StatusCode::NO_CONTENT
}

/// Send a private server message to the first session matching a display name
pub async fn post_private(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PrivateMessageRequest>,
) -> StatusCode {
    let display_name = DisplayName::new(request.display_name);
    state
        .coordinator
        .send_to_user(&display_name, request.text)
        .await;
    StatusCode::NO_CONTENT
}

/// Broadcast the de-duplicated participant count to all sessions
pub async fn post_user_count(State(state): State<Arc<AppState>>) -> StatusCode {
    state.coordinator.broadcast_user_count().await;
    StatusCode::NO_CONTENT
}
