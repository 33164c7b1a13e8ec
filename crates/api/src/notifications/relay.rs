//! Event bus to WebSocket relay.

use std::sync::Arc;

use axum::extract::ws::Message;
use boardhub_events::BoardEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::ws::WsManager;

/// Forwards [`BoardEvent`]s to team subscribers as JSON text frames.
///
/// Delivery is best effort: lagged events and serialization failures are
/// logged and skipped, never reported back to the publisher.
pub struct BoardEventRelay {
    ws_manager: Arc<WsManager>,
}

impl BoardEventRelay {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the relay loop until the bus closes or `cancel` fires.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<BoardEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            let next = tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Board event relay cancelled");
                    break;
                }
                next = receiver.recv() => next,
            };

            match next {
                Ok(event) => {
                    self.deliver(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Board event relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, board event relay shutting down");
                    break;
                }
            }
        }
    }

    /// Send one event to every connection subscribed to its team.
    pub async fn deliver(&self, event: &BoardEvent) -> usize {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, action = event.action(), "Failed to serialize board event");
                return 0;
            }
        };

        let sent = self
            .ws_manager
            .send_to_team(event.team_id(), Message::Text(payload.into()))
            .await;
        tracing::trace!(action = event.action(), team_id = %event.team_id(), sent, "Board event relayed");
        sent
    }
}
