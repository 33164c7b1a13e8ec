//! Repository for the `boards` table.

use boardhub_core::roles::board_types;
use boardhub_core::types::EntityId;
use sqlx::{PgConnection, PgPool};

use crate::models::board::Board;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, team_id, channel_id, created_by, modified_by, board_type, \
                                  minimum_role, title, description, icon, show_description, \
                                  is_template, template_version, properties, card_properties, \
                                  created_at, updated_at";

/// Provides CRUD operations for live boards.
pub struct BoardRepo;

impl BoardRepo {
    /// Insert a fully formed board row, returning it as stored.
    pub async fn insert(conn: &mut PgConnection, board: &Board) -> Result<Board, sqlx::Error> {
        let query = format!(
            "INSERT INTO boards ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(board.id)
            .bind(board.team_id)
            .bind(board.channel_id)
            .bind(board.created_by)
            .bind(board.modified_by)
            .bind(&board.board_type)
            .bind(&board.minimum_role)
            .bind(&board.title)
            .bind(&board.description)
            .bind(&board.icon)
            .bind(board.show_description)
            .bind(board.is_template)
            .bind(board.template_version)
            .bind(&board.properties)
            .bind(&board.card_properties)
            .bind(board.created_at)
            .bind(board.updated_at)
            .fetch_one(conn)
            .await
    }

    /// Find a live board by id.
    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Board>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM boards WHERE id = $1");
        sqlx::query_as::<_, Board>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live board and lock its row for the rest of the transaction.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: EntityId,
    ) -> Result<Option<Board>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM boards WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Board>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Overwrite every mutable column of an existing board.
    ///
    /// Returns `None` if the board no longer exists.
    pub async fn update(
        conn: &mut PgConnection,
        board: &Board,
    ) -> Result<Option<Board>, sqlx::Error> {
        let query = format!(
            "UPDATE boards SET
                channel_id = $2,
                modified_by = $3,
                board_type = $4,
                minimum_role = $5,
                title = $6,
                description = $7,
                icon = $8,
                show_description = $9,
                properties = $10,
                card_properties = $11,
                updated_at = $12
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(board.id)
            .bind(board.channel_id)
            .bind(board.modified_by)
            .bind(&board.board_type)
            .bind(&board.minimum_role)
            .bind(&board.title)
            .bind(&board.description)
            .bind(&board.icon)
            .bind(board.show_description)
            .bind(&board.properties)
            .bind(&board.card_properties)
            .bind(board.updated_at)
            .fetch_optional(conn)
            .await
    }

    /// Remove the live row. Members and blocks cascade. Returns `true` if a
    /// row was removed.
    pub async fn delete(conn: &mut PgConnection, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Non-template boards of a team that the user can see: those they are a
    /// member of plus every open board. Ordered by title.
    pub async fn list_for_user_and_team(
        pool: &PgPool,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<Vec<Board>, sqlx::Error> {
        Self::search_for_user_and_team(pool, "", user_id, team_id).await
    }

    /// As [`list_for_user_and_team`](Self::list_for_user_and_team), filtered
    /// by a case-insensitive title substring. An empty term matches all.
    pub async fn search_for_user_and_team(
        pool: &PgPool,
        term: &str,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<Vec<Board>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM boards b
             WHERE b.team_id = $1
               AND b.is_template = false
               AND (b.board_type = $3
                    OR EXISTS (SELECT 1 FROM board_members m
                               WHERE m.board_id = b.id AND m.user_id = $2))
               AND b.title ILIKE '%' || $4 || '%'
             ORDER BY b.title ASC, b.id ASC"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(team_id)
            .bind(user_id)
            .bind(board_types::OPEN)
            .bind(escape_like(term))
            .fetch_all(pool)
            .await
    }

    /// Template boards of a team, ordered by title.
    pub async fn list_templates(pool: &PgPool, team_id: EntityId) -> Result<Vec<Board>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM boards
             WHERE team_id = $1 AND is_template = true
             ORDER BY title ASC, id ASC"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(team_id)
            .fetch_all(pool)
            .await
    }
}

/// Escape `LIKE` wildcards so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
