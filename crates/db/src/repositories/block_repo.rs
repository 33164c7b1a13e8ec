//! Repository for the `blocks` table.

use boardhub_core::types::EntityId;
use sqlx::PgConnection;

use crate::models::block::Block;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, board_id, parent_id, block_type, title, fields, \
                                  created_by, modified_by, created_at, updated_at";

/// Provides the block operations needed by board duplication.
pub struct BlockRepo;

impl BlockRepo {
    /// Insert a fully formed block row, returning it as stored.
    pub async fn insert(conn: &mut PgConnection, block: &Block) -> Result<Block, sqlx::Error> {
        let query = format!(
            "INSERT INTO blocks ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(block.id)
            .bind(block.board_id)
            .bind(block.parent_id)
            .bind(&block.block_type)
            .bind(&block.title)
            .bind(&block.fields)
            .bind(block.created_by)
            .bind(block.modified_by)
            .bind(block.created_at)
            .bind(block.updated_at)
            .fetch_one(conn)
            .await
    }

    /// All live blocks of a board, oldest first.
    pub async fn list_for_board(
        conn: &mut PgConnection,
        board_id: EntityId,
    ) -> Result<Vec<Block>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blocks WHERE board_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(board_id)
            .fetch_all(conn)
            .await
    }
}
