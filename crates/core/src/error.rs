use crate::types::EntityId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Demoting or removing this member would leave the board without an admin.
    #[error("cannot leave board {board_id} with no admins")]
    LastBoardAdmin { board_id: EntityId },

    /// Board ids are assigned by the server.
    #[error("new board cannot have an ID")]
    NewBoardCannotHaveId,

    /// The installed license lacks the compliance feature.
    #[error("appropriate license required")]
    InsufficientLicense,

    /// A board resolved from the live table or history has no history rows.
    #[error("history not found for board {board_id}")]
    HistoryNotFound { board_id: EntityId },
}
