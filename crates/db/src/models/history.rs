//! Append-only history snapshots for boards and blocks.
//!
//! Every insert, patch and delete of a board or block writes one row here.
//! Rows are never updated or removed, so they outlive the live entity.

use boardhub_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::block::Block;
use crate::models::board::Board;

/// A row from the `board_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoardHistory {
    pub history_id: i64,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub board: Board,
    /// Set on the snapshot written when the board was deleted.
    pub deleted_at: Option<Timestamp>,
}

/// A row from the `block_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlockHistory {
    pub history_id: i64,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub block: Block,
    pub deleted_at: Option<Timestamp>,
}

/// Bounds and direction for a history query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub limit: i64,
    pub descending: bool,
}

impl HistoryQuery {
    /// The single oldest row.
    pub fn first() -> Self {
        Self {
            limit: 1,
            descending: false,
        }
    }

    /// The single newest row.
    pub fn last() -> Self {
        Self {
            limit: 1,
            descending: true,
        }
    }

    /// `ORDER BY` clause for the query direction.
    pub(crate) fn order_by(&self) -> &'static str {
        if self.descending {
            "updated_at DESC, history_id DESC"
        } else {
            "updated_at ASC, history_id ASC"
        }
    }
}
