//! Repository for the `board_members` table.

use boardhub_core::types::EntityId;
use sqlx::{PgConnection, PgPool};

use crate::models::board_member::BoardMember;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "board_id, user_id, minimum_role, scheme_admin, scheme_editor, \
                       scheme_commenter, scheme_viewer";

/// Provides CRUD operations for board memberships.
pub struct BoardMemberRepo;

impl BoardMemberRepo {
    /// Find one membership.
    pub async fn find(
        pool: &PgPool,
        board_id: EntityId,
        user_id: EntityId,
    ) -> Result<Option<BoardMember>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM board_members WHERE board_id = $1 AND user_id = $2");
        sqlx::query_as::<_, BoardMember>(&query)
            .bind(board_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// All members of a board.
    pub async fn list_for_board(
        pool: &PgPool,
        board_id: EntityId,
    ) -> Result<Vec<BoardMember>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM board_members WHERE board_id = $1 ORDER BY user_id");
        sqlx::query_as::<_, BoardMember>(&query)
            .bind(board_id)
            .fetch_all(pool)
            .await
    }

    /// All memberships held by a user.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: EntityId,
    ) -> Result<Vec<BoardMember>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM board_members WHERE user_id = $1 ORDER BY board_id");
        sqlx::query_as::<_, BoardMember>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Whether the user is a member of at least one live board of the team.
    pub async fn is_member_of_team(
        pool: &PgPool,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM board_members m
                JOIN boards b ON b.id = m.board_id
                WHERE m.user_id = $1 AND b.team_id = $2
             )",
        )
        .bind(user_id)
        .bind(team_id)
        .fetch_one(pool)
        .await
    }

    /// All members of a board, row-locked until the transaction ends.
    ///
    /// Concurrent guarded writes on the same board serialize here.
    pub async fn lock_for_board(
        conn: &mut PgConnection,
        board_id: EntityId,
    ) -> Result<Vec<BoardMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM board_members WHERE board_id = $1 ORDER BY user_id FOR UPDATE"
        );
        sqlx::query_as::<_, BoardMember>(&query)
            .bind(board_id)
            .fetch_all(conn)
            .await
    }

    /// Insert a membership or overwrite the roles of an existing one.
    pub async fn upsert(
        conn: &mut PgConnection,
        member: &BoardMember,
    ) -> Result<BoardMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO board_members ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (board_id, user_id) DO UPDATE SET
                minimum_role = EXCLUDED.minimum_role,
                scheme_admin = EXCLUDED.scheme_admin,
                scheme_editor = EXCLUDED.scheme_editor,
                scheme_commenter = EXCLUDED.scheme_commenter,
                scheme_viewer = EXCLUDED.scheme_viewer
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoardMember>(&query)
            .bind(member.board_id)
            .bind(member.user_id)
            .bind(&member.minimum_role)
            .bind(member.scheme_admin)
            .bind(member.scheme_editor)
            .bind(member.scheme_commenter)
            .bind(member.scheme_viewer)
            .fetch_one(conn)
            .await
    }

    /// Remove a membership. Returns `true` if a row was removed.
    pub async fn delete(
        conn: &mut PgConnection,
        board_id: EntityId,
        user_id: EntityId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM board_members WHERE board_id = $1 AND user_id = $2")
            .bind(board_id)
            .bind(user_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
