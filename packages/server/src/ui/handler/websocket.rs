//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionIdFactory, DisplayName},
    infrastructure::dto::websocket::ClientFrame,
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Caller-supplied display name; identity is out of scope here, so the
    /// value is treated as an opaque string. Missing or blank means unknown.
    pub display_name: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    let display_name = query
        .display_name
        .filter(|name| !name.trim().is_empty())
        .map(DisplayName::new);

    ws.on_upgrade(move |socket| handle_socket(socket, state, display_name))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This function handles the outbound flow: events issued by the coordinator
/// (via the broadcaster) are drained from the session's channel into this
/// client's WebSocket connection, preserving issue order.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the event to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, display_name: Option<DisplayName>) {
    let connection_id = ConnectionIdFactory::generate();
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // Outbound path first: the channel must be registered and draining
    // before on_connect issues the history snapshot and the join notice,
    // so the caller receives them in order on this very channel.
    let mut send_task = pusher_loop(rx, sender);
    state.broadcaster.register(connection_id.clone(), tx).await;
    state
        .coordinator
        .on_connect(connection_id.clone(), display_name)
        .await;

    let recv_state = state.clone();
    let recv_connection_id = connection_id.clone();

    // Inbound path: each text frame becomes one inbound-message trigger
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // JSON frame {"text": ...}; anything that does not parse
                    // is treated as the raw message text
                    let text = match serde_json::from_str::<ClientFrame>(&text) {
                        Ok(frame) => frame.text,
                        Err(_) => text.to_string(),
                    };

                    recv_state
                        .coordinator
                        .on_inbound_message(&recv_connection_id, text)
                        .await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!(
                        "Session '{}' requested close",
                        recv_connection_id.as_str()
                    );
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // A vanished socket is just another disconnect trigger
    state.coordinator.on_disconnect(&connection_id).await;
    state.broadcaster.unregister(&connection_id).await;
}
