//! Repository for the append-only `board_history` table.

use boardhub_core::types::{EntityId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::history::{BoardHistory, HistoryQuery};
use crate::repositories::board_repo::COLUMNS as BOARD_COLUMNS;

/// Column list for board history reads.
const COLUMNS: &str = "history_id, id, team_id, channel_id, created_by, modified_by, board_type, \
                       minimum_role, title, description, icon, show_description, is_template, \
                       template_version, properties, card_properties, created_at, updated_at, \
                       deleted_at";

/// Provides append and query operations for board history.
pub struct BoardHistoryRepo;

impl BoardHistoryRepo {
    /// Snapshot the current live row of a board. Returns the number of rows
    /// appended (0 if the board does not exist).
    pub async fn append_snapshot(
        conn: &mut PgConnection,
        board_id: EntityId,
    ) -> Result<u64, sqlx::Error> {
        let query = format!(
            "INSERT INTO board_history ({BOARD_COLUMNS})
             SELECT {BOARD_COLUMNS} FROM boards WHERE id = $1"
        );
        let result = sqlx::query(&query).bind(board_id).execute(conn).await?;
        Ok(result.rows_affected())
    }

    /// Snapshot a board as deleted by `user_id` at `deleted_at`. Must run
    /// before the live row is removed.
    pub async fn append_deletion(
        conn: &mut PgConnection,
        board_id: EntityId,
        user_id: EntityId,
        deleted_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO board_history (id, team_id, channel_id, created_by, modified_by,
                 board_type, minimum_role, title, description, icon, show_description,
                 is_template, template_version, properties, card_properties,
                 created_at, updated_at, deleted_at)
             SELECT id, team_id, channel_id, created_by, $2,
                 board_type, minimum_role, title, description, icon, show_description,
                 is_template, template_version, properties, card_properties,
                 created_at, $3, $3
             FROM boards WHERE id = $1",
        )
        .bind(board_id)
        .bind(user_id)
        .bind(deleted_at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// History rows of one board, bounded and ordered by `query`.
    pub async fn list(
        pool: &PgPool,
        board_id: EntityId,
        query: HistoryQuery,
    ) -> Result<Vec<BoardHistory>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM board_history
             WHERE id = $1
             ORDER BY {}
             LIMIT $2",
            query.order_by()
        );
        sqlx::query_as::<_, BoardHistory>(&sql)
            .bind(board_id)
            .bind(query.limit)
            .fetch_all(pool)
            .await
    }
}
