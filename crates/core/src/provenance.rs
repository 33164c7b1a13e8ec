//! Board provenance reconstructed from history.
//!
//! A board's activity window spans its own history rows and the history of
//! every block nested inside it. The board row supplies the baseline; the
//! descendant block only wins when it lies strictly outside that baseline.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

/// Which end of the activity window is being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Earliest,
    Latest,
}

impl Direction {
    /// History queries for the latest activity are read newest first.
    pub fn descending(self) -> bool {
        matches!(self, Direction::Latest)
    }
}

/// A point of activity: when it happened and who did it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityMark {
    pub at: Timestamp,
    pub by: EntityId,
}

/// Combine the board's own mark with the best descendant block mark.
///
/// Ties keep the board mark.
pub fn supersede(
    direction: Direction,
    board: ActivityMark,
    block: Option<ActivityMark>,
) -> ActivityMark {
    match (direction, block) {
        (Direction::Earliest, Some(block)) if block.at < board.at => block,
        (Direction::Latest, Some(block)) if block.at > board.at => block,
        _ => board,
    }
}

/// Derived, never-persisted provenance summary for a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMetadata {
    pub board_id: EntityId,
    pub descendant_first_update_at: Timestamp,
    pub descendant_last_update_at: Timestamp,
    pub created_by: EntityId,
    pub first_modified_by: EntityId,
    pub last_modified_by: EntityId,
}

impl BoardMetadata {
    pub fn assemble(
        board_id: EntityId,
        created_by: EntityId,
        earliest: ActivityMark,
        latest: ActivityMark,
    ) -> Self {
        Self {
            board_id,
            descendant_first_update_at: earliest.at,
            descendant_last_update_at: latest.at,
            created_by,
            first_modified_by: earliest.by,
            last_modified_by: latest.by,
        }
    }
}
