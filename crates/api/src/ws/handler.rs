use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::response::IntoResponse;
use boardhub_core::error::CoreError;
use boardhub_core::types::EntityId;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::auth::jwt::validate_token;
use crate::boards::BoardService;
use crate::error::AppError;
use crate::middleware::auth::bearer_token;
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Query parameters accepted on the upgrade request. Browsers cannot set
/// headers on WebSocket requests, so the token may travel in the query.
#[derive(Debug, Default, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// The user behind a WebSocket upgrade, from `?token=` or a Bearer header.
///
/// Extracted before [`WebSocketUpgrade`] so an anonymous request is refused
/// with 401 instead of being upgraded.
#[derive(Debug, Clone, Copy)]
pub struct WsUser(pub EntityId);

impl FromRequestParts<AppState> for WsUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let params = Query::<WsParams>::try_from_uri(&parts.uri)
            .map(|Query(params)| params)
            .unwrap_or_default();
        let token = match params.token.as_deref() {
            Some(token) => token,
            None => bearer_token(&parts.headers)?,
        };
        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;
        Ok(WsUser(claims.sub))
    }
}

/// Messages a client may send over the socket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientCommand {
    SubscribeTeam { team_id: EntityId },
    UnsubscribeTeam { team_id: EntityId },
}

/// HTTP handler that upgrades an authenticated connection to WebSocket.
pub async fn ws_handler(
    WsUser(user_id): WsUser,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager, state.boards, user_id))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Registers the connection, spawns a sender task that drains the manager
/// channel into the sink, and processes inbound commands until the client
/// goes away.
async fn handle_socket(
    socket: WebSocket,
    ws_manager: Arc<WsManager>,
    boards: Arc<BoardService>,
    user_id: EntityId,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, %user_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone(), user_id).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientCommand>(text.as_str()) {
                Ok(command) => {
                    apply_command(&ws_manager, &boards, &conn_id, command).await;
                }
                Err(e) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "Ignoring unrecognised WebSocket message");
                }
            },
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Apply one client command to a registered connection.
///
/// A team subscription is granted only when the connection's user is a
/// member of some board in that team. Returns whether the command took
/// effect.
pub async fn apply_command(
    ws_manager: &WsManager,
    boards: &BoardService,
    conn_id: &str,
    command: ClientCommand,
) -> bool {
    let Some(user_id) = ws_manager.user_of(conn_id).await else {
        return false;
    };

    match command {
        ClientCommand::SubscribeTeam { team_id } => {
            match boards.is_member_of_team(user_id, team_id).await {
                Ok(true) => {
                    tracing::debug!(conn_id, %user_id, %team_id, "Subscribed to team");
                    ws_manager.subscribe_team(conn_id, team_id).await
                }
                Ok(false) => {
                    tracing::warn!(conn_id, %user_id, %team_id, "Team subscription refused, not a member");
                    false
                }
                Err(e) => {
                    tracing::error!(conn_id, %team_id, error = %e, "Team membership check failed");
                    false
                }
            }
        }
        ClientCommand::UnsubscribeTeam { team_id } => {
            tracing::debug!(conn_id, %team_id, "Unsubscribed from team");
            ws_manager.unsubscribe_team(conn_id, team_id).await
        }
    }
}
