//! Group chat server with WebSocket broadcast.
//!
//! Tracks connected participants, retains the most recent messages, and fans
//! out chat and presence events to every connected client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use hiroba_server::{
    infrastructure::{
        broadcaster::WebSocketBroadcaster,
        inmemory::{InMemoryConnectionRegistry, InMemoryMessageHistory},
    },
    ui::Server,
    usecase::ChatCoordinator,
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Group chat server with WebSocket broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("hiroba_server=debug,hiroba_shared=debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. In-memory stores (registry, history)
    // 2. Broadcaster
    // 3. Coordinator
    // 4. Server

    // 1. Create in-memory stores (process-lifetime state, lost on restart)
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let history = Arc::new(InMemoryMessageHistory::new());

    // 2. Create the WebSocket broadcaster
    let broadcaster = Arc::new(WebSocketBroadcaster::new());

    // 3. Create the coordinator (single in-process authority for state)
    let coordinator = Arc::new(ChatCoordinator::new(
        registry,
        history,
        broadcaster.clone(),
        Arc::new(SystemClock),
    ));

    // 4. Create and run the server
    let server = Server::new(coordinator, broadcaster);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
