use std::sync::Arc;

use crate::boards::BoardService;
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything heavy sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used directly by the health check.
    pub pool: boardhub_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Board change notifications, consumed by the WebSocket relay.
    pub event_bus: Arc<boardhub_events::EventBus>,
    pub boards: Arc<BoardService>,
}
