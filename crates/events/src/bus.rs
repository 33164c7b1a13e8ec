//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the board service,
//! which publishes, and the notification relay, which forwards events to
//! WebSocket clients. Publishing never blocks and never fails.

use boardhub_core::types::EntityId;
use boardhub_db::models::block::Block;
use boardhub_db::models::board::Board;
use boardhub_db::models::board_member::BoardMember;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// BoardEvent
// ---------------------------------------------------------------------------

/// A change to a board, block or membership, scoped to the owning team.
///
/// Serialized with an `action` tag, e.g.
/// `{"action":"DELETE_BOARD","team_id":"…","board_id":"…"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardEvent {
    /// Full board state after create, patch or duplication.
    UpdateBoard { team_id: EntityId, board: Board },
    DeleteBoard {
        team_id: EntityId,
        board_id: EntityId,
    },
    UpdateBlock { team_id: EntityId, block: Block },
    UpdateMember {
        team_id: EntityId,
        member: BoardMember,
    },
    /// The membership as it was before removal.
    DeleteMember {
        team_id: EntityId,
        member: BoardMember,
    },
}

impl BoardEvent {
    /// The team whose subscribers receive this event.
    pub fn team_id(&self) -> EntityId {
        match self {
            Self::UpdateBoard { team_id, .. }
            | Self::DeleteBoard { team_id, .. }
            | Self::UpdateBlock { team_id, .. }
            | Self::UpdateMember { team_id, .. }
            | Self::DeleteMember { team_id, .. } => *team_id,
        }
    }

    /// The wire name of the event's action.
    pub fn action(&self) -> &'static str {
        match self {
            Self::UpdateBoard { .. } => "UPDATE_BOARD",
            Self::DeleteBoard { .. } => "DELETE_BOARD",
            Self::UpdateBlock { .. } => "UPDATE_BLOCK",
            Self::UpdateMember { .. } => "UPDATE_MEMBER",
            Self::DeleteMember { .. } => "DELETE_MEMBER",
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use boardhub_events::EventBus;
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// let team_id = boardhub_core::ids::new_id();
/// bus.broadcast_board_delete(team_id, boardhub_core::ids::new_id());
/// assert_eq!(rx.try_recv().unwrap().team_id(), team_id);
/// ```
pub struct EventBus {
    sender: broadcast::Sender<BoardEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no active subscribers the event is silently dropped.
    pub fn publish(&self, event: BoardEvent) {
        tracing::trace!(action = event.action(), team_id = %event.team_id(), "Publishing board event");
        // A SendError only means there are zero receivers.
        if let Err(dropped) = self.sender.send(event) {
            tracing::debug!(action = dropped.0.action(), "No subscribers, board event dropped");
        }
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn broadcast_board_change(&self, team_id: EntityId, board: Board) {
        self.publish(BoardEvent::UpdateBoard { team_id, board });
    }

    pub fn broadcast_board_delete(&self, team_id: EntityId, board_id: EntityId) {
        self.publish(BoardEvent::DeleteBoard { team_id, board_id });
    }

    pub fn broadcast_block_change(&self, team_id: EntityId, block: Block) {
        self.publish(BoardEvent::UpdateBlock { team_id, block });
    }

    pub fn broadcast_member_change(&self, team_id: EntityId, member: BoardMember) {
        self.publish(BoardEvent::UpdateMember { team_id, member });
    }

    pub fn broadcast_member_delete(&self, team_id: EntityId, member: BoardMember) {
        self.publish(BoardEvent::DeleteMember { team_id, member });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use boardhub_db::models::board::CreateBoard;
    use chrono::Utc;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};
    use uuid::Uuid;

    fn board(team: u128) -> Board {
        let input = CreateBoard {
            team_id: Uuid::from_u128(team),
            title: Some("Roadmap".into()),
            ..Default::default()
        };
        Board::from_create(Uuid::from_u128(10), &input, Uuid::from_u128(5), Utc::now())
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.broadcast_board_change(Uuid::from_u128(1), board(1));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.action(), "UPDATE_BOARD");
        assert_eq!(received.team_id(), Uuid::from_u128(1));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.broadcast_board_delete(Uuid::from_u128(1), Uuid::from_u128(10));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(e1, e2);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.broadcast_board_delete(Uuid::from_u128(1), Uuid::from_u128(10));
    }

    #[test]
    fn slow_subscriber_lags_instead_of_blocking() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for i in 0..5 {
            bus.broadcast_board_delete(Uuid::from_u128(1), Uuid::from_u128(i));
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(3))));
    }

    #[tokio::test]
    async fn dropping_bus_closes_subscribers() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        drop(bus);
        assert!(matches!(rx.recv().await, Err(RecvError::Closed)));
    }

    #[test]
    fn delete_board_serializes_with_action_tag() {
        let event = BoardEvent::DeleteBoard {
            team_id: Uuid::from_u128(1),
            board_id: Uuid::from_u128(2),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "DELETE_BOARD");
        assert_eq!(json["team_id"], Uuid::from_u128(1).to_string());
        assert_eq!(json["board_id"], Uuid::from_u128(2).to_string());
    }

    #[test]
    fn update_board_round_trips_payload() {
        let event = BoardEvent::UpdateBoard {
            team_id: Uuid::from_u128(1),
            board: board(1),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"action\":\"UPDATE_BOARD\""));
        let back: BoardEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
