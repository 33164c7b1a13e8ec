//! Repository for the append-only `block_history` table.

use boardhub_core::types::{EntityId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::history::{BlockHistory, HistoryQuery};
use crate::repositories::block_repo::COLUMNS as BLOCK_COLUMNS;

/// Column list for block history reads.
const COLUMNS: &str = "history_id, id, board_id, parent_id, block_type, title, fields, \
                       created_by, modified_by, created_at, updated_at, deleted_at";

/// Provides append and query operations for block history.
pub struct BlockHistoryRepo;

impl BlockHistoryRepo {
    /// Snapshot the current live row of a block.
    pub async fn append_snapshot(
        conn: &mut PgConnection,
        block_id: EntityId,
    ) -> Result<u64, sqlx::Error> {
        let query = format!(
            "INSERT INTO block_history ({BLOCK_COLUMNS})
             SELECT {BLOCK_COLUMNS} FROM blocks WHERE id = $1"
        );
        let result = sqlx::query(&query).bind(block_id).execute(conn).await?;
        Ok(result.rows_affected())
    }

    /// Snapshot every live block of a board as deleted. Used before the
    /// board's live row (and, by cascade, its blocks) is removed.
    pub async fn append_board_deletion(
        conn: &mut PgConnection,
        board_id: EntityId,
        user_id: EntityId,
        deleted_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO block_history (id, board_id, parent_id, block_type, title, fields,
                 created_by, modified_by, created_at, updated_at, deleted_at)
             SELECT id, board_id, parent_id, block_type, title, fields,
                 created_by, $2, created_at, $3, $3
             FROM blocks WHERE board_id = $1",
        )
        .bind(board_id)
        .bind(user_id)
        .bind(deleted_at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// History rows of every block that belongs to `board_id`, including
    /// blocks that no longer exist.
    pub async fn list_descendants(
        pool: &PgPool,
        board_id: EntityId,
        query: HistoryQuery,
    ) -> Result<Vec<BlockHistory>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM block_history
             WHERE board_id = $1
             ORDER BY {}
             LIMIT $2",
            query.order_by()
        );
        sqlx::query_as::<_, BlockHistory>(&sql)
            .bind(board_id)
            .bind(query.limit)
            .fetch_all(pool)
            .await
    }
}
