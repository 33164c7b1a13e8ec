//! WebSocket infrastructure for real-time board updates.
//!
//! Provides connection management with per-team subscriptions, heartbeat
//! monitoring, and the HTTP upgrade handler used by Axum routes.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::{apply_command, ws_handler, ClientCommand, WsUser};
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
