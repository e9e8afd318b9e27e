//! Group-chat backend library.
//!
//! This library provides the in-memory state coordinator for a real-time
//! group chat: live-connection tracking, a bounded message history, and
//! ordered broadcast of chat and presence events over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
