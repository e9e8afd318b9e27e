//! Integration tests driving the server in-process over real WebSocket and
//! HTTP connections.
//!
//! Each test boots the full router on an ephemeral port, connects one or
//! more WebSocket clients, and asserts on the wire events they receive.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use hiroba_server::{
    infrastructure::{
        broadcaster::WebSocketBroadcaster,
        inmemory::{InMemoryConnectionRegistry, InMemoryMessageHistory},
    },
    ui::Server,
    usecase::ChatCoordinator,
};
use hiroba_shared::time::SystemClock;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Boot a full server on an ephemeral port and return its address
async fn spawn_server() -> String {
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let history = Arc::new(InMemoryMessageHistory::new());
    let broadcaster = Arc::new(WebSocketBroadcaster::new());
    let coordinator = Arc::new(ChatCoordinator::new(
        registry,
        history,
        broadcaster.clone(),
        Arc::new(SystemClock),
    ));
    let server = Server::new(coordinator, broadcaster);
    let router = server.router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server crashed");
    });

    addr.to_string()
}

/// Helper struct wrapping one WebSocket client connection
struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect with a display name
    async fn connect(addr: &str, display_name: &str) -> Self {
        let url = format!("ws://{addr}/ws?display_name={display_name}");
        let (ws, _) = connect_async(url).await.expect("Failed to connect");
        Self { ws }
    }

    /// Connect without supplying a display name
    async fn connect_anonymous(addr: &str) -> Self {
        let url = format!("ws://{addr}/ws");
        let (ws, _) = connect_async(url).await.expect("Failed to connect");
        Self { ws }
    }

    /// Receive the next wire event as JSON, with a timeout
    async fn next_event(&mut self) -> serde_json::Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("Timed out waiting for event")
                .expect("Connection closed while waiting for event")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(&text).expect("Event is not valid JSON");
            }
        }
    }

    /// Drain the three events every new connection receives
    /// (LoadRecentMessages, UserJoined, UpdateUserList)
    async fn drain_connect_sequence(&mut self) {
        for _ in 0..3 {
            self.next_event().await;
        }
    }

    /// Send a chat input frame
    async fn send_text(&mut self, text: &str) {
        let frame = serde_json::json!({ "text": text }).to_string();
        self.ws
            .send(Message::Text(frame.into()))
            .await
            .expect("Failed to send frame");
    }

    /// Close the connection
    async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}

#[tokio::test]
async fn test_connect_receives_history_then_join_then_user_list() {
    let addr = spawn_server().await;

    let mut alice = TestClient::connect(&addr, "alice").await;

    // The very first event must be the (empty) history snapshot, so a new
    // participant never sees its own join duplicated inside fresh history
    let first = alice.next_event().await;
    assert_eq!(first["event"], "LoadRecentMessages");
    assert!(first["payload"].as_array().unwrap().is_empty());

    let second = alice.next_event().await;
    assert_eq!(second["event"], "UserJoined");
    assert_eq!(second["payload"], "alice");

    let third = alice.next_event().await;
    assert_eq!(third["event"], "UpdateUserList");
    assert_eq!(third["payload"], serde_json::json!(["alice"]));
}

#[tokio::test]
async fn test_connect_without_display_name_uses_sentinel() {
    let addr = spawn_server().await;

    let mut client = TestClient::connect_anonymous(&addr).await;

    let _history = client.next_event().await;
    let joined = client.next_event().await;
    assert_eq!(joined["event"], "UserJoined");
    assert_eq!(joined["payload"], "User Unknown");
}

#[tokio::test]
async fn test_existing_client_sees_newcomer_join() {
    let addr = spawn_server().await;

    let mut alice = TestClient::connect(&addr, "alice").await;
    alice.drain_connect_sequence().await;

    let mut bob = TestClient::connect(&addr, "bob").await;
    bob.drain_connect_sequence().await;

    let joined = alice.next_event().await;
    assert_eq!(joined["event"], "UserJoined");
    assert_eq!(joined["payload"], "bob");

    let list = alice.next_event().await;
    assert_eq!(list["event"], "UpdateUserList");
    assert_eq!(list["payload"], serde_json::json!(["alice", "bob"]));
}

#[tokio::test]
async fn test_message_is_fanned_out_to_all_clients() {
    let addr = spawn_server().await;

    let mut alice = TestClient::connect(&addr, "alice").await;
    alice.drain_connect_sequence().await;
    let mut bob = TestClient::connect(&addr, "bob").await;
    bob.drain_connect_sequence().await;
    // alice still has bob's join + list updates queued
    alice.next_event().await;
    alice.next_event().await;

    alice.send_text("hello").await;

    for client in [&mut alice, &mut bob] {
        let event = client.next_event().await;
        assert_eq!(event["event"], "ReceiveMessage");
        assert_eq!(event["payload"]["author"], "alice");
        assert_eq!(event["payload"]["text"], "hello");
        assert_eq!(event["payload"]["isSystem"], false);
    }
}

#[tokio::test]
async fn test_newcomer_receives_earlier_messages_in_snapshot() {
    let addr = spawn_server().await;

    let mut alice = TestClient::connect(&addr, "alice").await;
    alice.drain_connect_sequence().await;
    alice.send_text("hello").await;
    let own_echo = alice.next_event().await;
    assert_eq!(own_echo["event"], "ReceiveMessage");

    let mut bob = TestClient::connect(&addr, "bob").await;
    let snapshot = bob.next_event().await;
    assert_eq!(snapshot["event"], "LoadRecentMessages");
    let events = snapshot["payload"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["author"], "alice");
    assert_eq!(events[0]["text"], "hello");
}

#[tokio::test]
async fn test_whitespace_only_message_is_not_broadcast() {
    let addr = spawn_server().await;

    let mut alice = TestClient::connect(&addr, "alice").await;
    alice.drain_connect_sequence().await;

    alice.send_text("   ").await;
    alice.send_text("real message").await;

    // The whitespace frame produces nothing; the next event observed is the
    // broadcast of the real message
    let event = alice.next_event().await;
    assert_eq!(event["event"], "ReceiveMessage");
    assert_eq!(event["payload"]["text"], "real message");
}

#[tokio::test]
async fn test_disconnect_notifies_remaining_clients() {
    let addr = spawn_server().await;

    let mut alice = TestClient::connect(&addr, "alice").await;
    alice.drain_connect_sequence().await;
    let mut bob = TestClient::connect(&addr, "bob").await;
    bob.drain_connect_sequence().await;
    alice.next_event().await;
    alice.next_event().await;

    bob.close().await;

    let left = alice.next_event().await;
    assert_eq!(left["event"], "UserLeft");
    assert_eq!(left["payload"], "bob");

    let list = alice.next_event().await;
    assert_eq!(list["event"], "UpdateUserList");
    assert_eq!(list["payload"], serde_json::json!(["alice"]));
}

#[tokio::test]
async fn test_server_actions_over_http_api() {
    let addr = spawn_server().await;
    let http = reqwest::Client::new();

    let mut alice = TestClient::connect(&addr, "alice").await;
    alice.drain_connect_sequence().await;

    // Announcement: Speaker label, lands in history
    let response = http
        .post(format!("http://{addr}/api/server/announce"))
        .json(&serde_json::json!({ "text": "doors open" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    let event = alice.next_event().await;
    assert_eq!(event["event"], "ReceiveMessage");
    assert_eq!(event["payload"]["author"], "Speaker");
    assert_eq!(event["payload"]["isSystem"], true);

    // Server broadcast: Server label, lands in history
    http.post(format!("http://{addr}/api/server/broadcast"))
        .json(&serde_json::json!({ "text": "maintenance soon" }))
        .send()
        .await
        .unwrap();

    let event = alice.next_event().await;
    assert_eq!(event["payload"]["author"], "Server");

    // User count: standalone numeric update, not a chat event
    http.post(format!("http://{addr}/api/server/user-count"))
        .send()
        .await
        .unwrap();

    let event = alice.next_event().await;
    assert_eq!(event["event"], "UpdateUserCount");
    assert_eq!(event["payload"], 1);

    // Private message: delivered to alice only, never stored
    http.post(format!("http://{addr}/api/server/private"))
        .json(&serde_json::json!({ "displayName": "alice", "text": "psst" }))
        .send()
        .await
        .unwrap();

    let event = alice.next_event().await;
    assert_eq!(event["payload"]["author"], "Server (private)");
    assert_eq!(event["payload"]["text"], "psst");

    // History holds the two shared system events, not the private one
    let messages: serde_json::Value = http
        .get(format!("http://{addr}/api/messages"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["author"], "Speaker");
    assert_eq!(messages[1]["author"], "Server");

    // Connected users query
    let users: serde_json::Value = http
        .get(format!("http://{addr}/api/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users, serde_json::json!(["alice"]));
}

#[tokio::test]
async fn test_private_send_to_unknown_user_is_a_silent_no_op() {
    let addr = spawn_server().await;
    let http = reqwest::Client::new();

    let mut alice = TestClient::connect(&addr, "alice").await;
    alice.drain_connect_sequence().await;

    let response = http
        .post(format!("http://{addr}/api/server/private"))
        .json(&serde_json::json!({ "displayName": "bob", "text": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    // Nothing was delivered; the next observable event is a real broadcast
    http.post(format!("http://{addr}/api/server/broadcast"))
        .json(&serde_json::json!({ "text": "checkpoint" }))
        .send()
        .await
        .unwrap();

    let event = alice.next_event().await;
    assert_eq!(event["payload"]["text"], "checkpoint");
}

#[tokio::test]
async fn test_health_check() {
    let addr = spawn_server().await;

    let response: serde_json::Value = reqwest::get(format!("http://{addr}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(response["status"], "ok");
}
