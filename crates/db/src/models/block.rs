//! Content block model.

use boardhub_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A row from the `blocks` table. Blocks nest under a board via `board_id`
/// and under each other via `parent_id`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Block {
    pub id: EntityId,
    pub board_id: EntityId,
    pub parent_id: EntityId,
    pub block_type: String,
    pub title: String,
    pub fields: Value,
    pub created_by: EntityId,
    pub modified_by: EntityId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
