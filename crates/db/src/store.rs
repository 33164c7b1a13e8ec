//! The store facade consumed by the board service.
//!
//! [`BoardStore`] is the narrow interface the API layer depends on, so the
//! service logic can run against Postgres in production and an in-memory
//! double in tests. [`PgBoardStore`] composes the repositories and owns the
//! transaction boundaries: every live write appends its history row in the
//! same transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use boardhub_core::ids::new_id;
use boardhub_core::quorum;
use boardhub_core::types::EntityId;
use chrono::Utc;
use serde::Serialize;

use crate::models::block::Block;
use crate::models::board::{Board, BoardPatch, CreateBoard};
use crate::models::board_member::BoardMember;
use crate::models::history::{BlockHistory, BoardHistory, HistoryQuery};
use crate::repositories::{
    BlockHistoryRepo, BlockRepo, BoardHistoryRepo, BoardMemberRepo, BoardRepo,
};
use crate::DbPool;

/// Whether a membership write must keep another admin on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminGuard {
    /// Write unconditionally.
    Unchecked,
    /// Re-check, inside the write transaction, that some other member is an
    /// admin; refuse the write otherwise.
    RequireOtherAdmin,
}

/// Outcome of a guarded membership write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberWrite<T> {
    Applied(T),
    /// Refused: the write would have left the board with no admin.
    LastAdmin,
}

/// Everything produced by duplicating a board.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DuplicatedBoard {
    pub boards: Vec<Board>,
    pub blocks: Vec<Block>,
    pub members: Vec<BoardMember>,
}

/// Persistence operations for boards, memberships and their history.
///
/// Absence is reported through `Option`/`bool`; `Err` is reserved for
/// infrastructure failures.
#[async_trait]
pub trait BoardStore: Send + Sync {
    async fn get_board(&self, id: EntityId) -> Result<Option<Board>, sqlx::Error>;

    async fn get_board_history(
        &self,
        board_id: EntityId,
        query: HistoryQuery,
    ) -> Result<Vec<BoardHistory>, sqlx::Error>;

    async fn get_block_history_descendants(
        &self,
        board_id: EntityId,
        query: HistoryQuery,
    ) -> Result<Vec<BlockHistory>, sqlx::Error>;

    async fn insert_board(
        &self,
        id: EntityId,
        input: &CreateBoard,
        user_id: EntityId,
    ) -> Result<Board, sqlx::Error>;

    /// Insert a board and make `user_id` its first admin in one transaction.
    async fn insert_board_with_admin(
        &self,
        id: EntityId,
        input: &CreateBoard,
        user_id: EntityId,
    ) -> Result<(Board, BoardMember), sqlx::Error>;

    /// Returns `None` if the board does not exist.
    async fn patch_board(
        &self,
        id: EntityId,
        patch: &BoardPatch,
        user_id: EntityId,
    ) -> Result<Option<Board>, sqlx::Error>;

    /// Returns `false` if the board did not exist.
    async fn delete_board(&self, id: EntityId, user_id: EntityId) -> Result<bool, sqlx::Error>;

    async fn get_member_for_board(
        &self,
        board_id: EntityId,
        user_id: EntityId,
    ) -> Result<Option<BoardMember>, sqlx::Error>;

    async fn get_members_for_board(
        &self,
        board_id: EntityId,
    ) -> Result<Vec<BoardMember>, sqlx::Error>;

    async fn get_members_for_user(&self, user_id: EntityId)
        -> Result<Vec<BoardMember>, sqlx::Error>;

    /// Whether the user holds a membership on any live board of the team.
    async fn is_member_of_team(
        &self,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<bool, sqlx::Error>;

    /// Insert or overwrite a membership.
    async fn save_member(
        &self,
        member: &BoardMember,
        guard: AdminGuard,
    ) -> Result<MemberWrite<BoardMember>, sqlx::Error>;

    /// Remove a membership. Removing a missing membership is applied as a no-op.
    async fn delete_member(
        &self,
        board_id: EntityId,
        user_id: EntityId,
        guard: AdminGuard,
    ) -> Result<MemberWrite<()>, sqlx::Error>;

    /// Deep-copy a board with its blocks. Returns `None` if the source board
    /// does not exist.
    async fn duplicate_board(
        &self,
        id: EntityId,
        user_id: EntityId,
        to_team: Option<EntityId>,
        as_template: bool,
    ) -> Result<Option<DuplicatedBoard>, sqlx::Error>;

    async fn get_boards_for_user_and_team(
        &self,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<Vec<Board>, sqlx::Error>;

    async fn get_template_boards(&self, team_id: EntityId) -> Result<Vec<Board>, sqlx::Error>;

    async fn search_boards_for_user_and_team(
        &self,
        term: &str,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<Vec<Board>, sqlx::Error>;
}

/// [`BoardStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgBoardStore {
    pool: DbPool,
}

impl PgBoardStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Whether the guard refuses removing or demoting `user_id` given the
/// locked membership.
fn guard_refuses(guard: AdminGuard, members: &[BoardMember], user_id: EntityId) -> bool {
    guard == AdminGuard::RequireOtherAdmin
        && quorum::is_last_admin(members.iter().map(|m| (m.user_id, m.scheme_admin)), user_id)
}

#[async_trait]
impl BoardStore for PgBoardStore {
    async fn get_board(&self, id: EntityId) -> Result<Option<Board>, sqlx::Error> {
        BoardRepo::find_by_id(&self.pool, id).await
    }

    async fn get_board_history(
        &self,
        board_id: EntityId,
        query: HistoryQuery,
    ) -> Result<Vec<BoardHistory>, sqlx::Error> {
        BoardHistoryRepo::list(&self.pool, board_id, query).await
    }

    async fn get_block_history_descendants(
        &self,
        board_id: EntityId,
        query: HistoryQuery,
    ) -> Result<Vec<BlockHistory>, sqlx::Error> {
        BlockHistoryRepo::list_descendants(&self.pool, board_id, query).await
    }

    async fn insert_board(
        &self,
        id: EntityId,
        input: &CreateBoard,
        user_id: EntityId,
    ) -> Result<Board, sqlx::Error> {
        let board = Board::from_create(id, input, user_id, Utc::now());

        let mut tx = self.pool.begin().await?;
        let board = BoardRepo::insert(&mut tx, &board).await?;
        BoardHistoryRepo::append_snapshot(&mut tx, board.id).await?;
        tx.commit().await?;

        Ok(board)
    }

    async fn insert_board_with_admin(
        &self,
        id: EntityId,
        input: &CreateBoard,
        user_id: EntityId,
    ) -> Result<(Board, BoardMember), sqlx::Error> {
        let board = Board::from_create(id, input, user_id, Utc::now());

        let mut tx = self.pool.begin().await?;
        let board = BoardRepo::insert(&mut tx, &board).await?;
        BoardHistoryRepo::append_snapshot(&mut tx, board.id).await?;
        let member = BoardMemberRepo::upsert(&mut tx, &BoardMember::admin(board.id, user_id)).await?;
        tx.commit().await?;

        Ok((board, member))
    }

    async fn patch_board(
        &self,
        id: EntityId,
        patch: &BoardPatch,
        user_id: EntityId,
    ) -> Result<Option<Board>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let Some(mut board) = BoardRepo::find_for_update(&mut tx, id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut board);
        board.modified_by = user_id;
        board.updated_at = Utc::now();

        let updated = BoardRepo::update(&mut tx, &board).await?;
        if updated.is_some() {
            BoardHistoryRepo::append_snapshot(&mut tx, id).await?;
        }
        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_board(&self, id: EntityId, user_id: EntityId) -> Result<bool, sqlx::Error> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        if BoardRepo::find_for_update(&mut tx, id).await?.is_none() {
            return Ok(false);
        }
        BlockHistoryRepo::append_board_deletion(&mut tx, id, user_id, now).await?;
        BoardHistoryRepo::append_deletion(&mut tx, id, user_id, now).await?;
        let deleted = BoardRepo::delete(&mut tx, id).await?;
        tx.commit().await?;

        tracing::debug!(board_id = %id, %user_id, "Board row removed, history retained");
        Ok(deleted)
    }

    async fn get_member_for_board(
        &self,
        board_id: EntityId,
        user_id: EntityId,
    ) -> Result<Option<BoardMember>, sqlx::Error> {
        BoardMemberRepo::find(&self.pool, board_id, user_id).await
    }

    async fn get_members_for_board(
        &self,
        board_id: EntityId,
    ) -> Result<Vec<BoardMember>, sqlx::Error> {
        BoardMemberRepo::list_for_board(&self.pool, board_id).await
    }

    async fn get_members_for_user(
        &self,
        user_id: EntityId,
    ) -> Result<Vec<BoardMember>, sqlx::Error> {
        BoardMemberRepo::list_for_user(&self.pool, user_id).await
    }

    async fn is_member_of_team(
        &self,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<bool, sqlx::Error> {
        BoardMemberRepo::is_member_of_team(&self.pool, user_id, team_id).await
    }

    async fn save_member(
        &self,
        member: &BoardMember,
        guard: AdminGuard,
    ) -> Result<MemberWrite<BoardMember>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        if guard == AdminGuard::RequireOtherAdmin {
            let members = BoardMemberRepo::lock_for_board(&mut tx, member.board_id).await?;
            if guard_refuses(guard, &members, member.user_id) {
                tracing::debug!(
                    board_id = %member.board_id,
                    user_id = %member.user_id,
                    "Guarded member update refused, no other admin"
                );
                return Ok(MemberWrite::LastAdmin);
            }
        }

        let saved = BoardMemberRepo::upsert(&mut tx, member).await?;
        tx.commit().await?;
        Ok(MemberWrite::Applied(saved))
    }

    async fn delete_member(
        &self,
        board_id: EntityId,
        user_id: EntityId,
        guard: AdminGuard,
    ) -> Result<MemberWrite<()>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        if guard == AdminGuard::RequireOtherAdmin {
            let members = BoardMemberRepo::lock_for_board(&mut tx, board_id).await?;
            if guard_refuses(guard, &members, user_id) {
                tracing::debug!(%board_id, %user_id, "Guarded member removal refused, no other admin");
                return Ok(MemberWrite::LastAdmin);
            }
        }

        BoardMemberRepo::delete(&mut tx, board_id, user_id).await?;
        tx.commit().await?;
        Ok(MemberWrite::Applied(()))
    }

    async fn duplicate_board(
        &self,
        id: EntityId,
        user_id: EntityId,
        to_team: Option<EntityId>,
        as_template: bool,
    ) -> Result<Option<DuplicatedBoard>, sqlx::Error> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let Some(source) = BoardRepo::find_for_update(&mut tx, id).await? else {
            return Ok(None);
        };
        let source_blocks = BlockRepo::list_for_board(&mut tx, id).await?;

        let copy = Board {
            id: new_id(),
            team_id: to_team.unwrap_or(source.team_id),
            created_by: user_id,
            modified_by: user_id,
            is_template: as_template,
            created_at: now,
            updated_at: now,
            ..source.clone()
        };
        let board = BoardRepo::insert(&mut tx, &copy).await?;
        BoardHistoryRepo::append_snapshot(&mut tx, board.id).await?;

        // Assign every id first so parent pointers can be remapped in one pass.
        let mut id_map: HashMap<EntityId, EntityId> =
            source_blocks.iter().map(|b| (b.id, new_id())).collect();
        id_map.insert(source.id, board.id);

        let mut blocks = Vec::with_capacity(source_blocks.len());
        for source_block in &source_blocks {
            let block = Block {
                id: id_map[&source_block.id],
                board_id: board.id,
                parent_id: id_map
                    .get(&source_block.parent_id)
                    .copied()
                    .unwrap_or(source_block.parent_id),
                created_by: user_id,
                modified_by: user_id,
                created_at: now,
                updated_at: now,
                ..source_block.clone()
            };
            let block = BlockRepo::insert(&mut tx, &block).await?;
            BlockHistoryRepo::append_snapshot(&mut tx, block.id).await?;
            blocks.push(block);
        }

        let member = BoardMemberRepo::upsert(&mut tx, &BoardMember::admin(board.id, user_id)).await?;
        tx.commit().await?;

        Ok(Some(DuplicatedBoard {
            boards: vec![board],
            blocks,
            members: vec![member],
        }))
    }

    async fn get_boards_for_user_and_team(
        &self,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<Vec<Board>, sqlx::Error> {
        BoardRepo::list_for_user_and_team(&self.pool, user_id, team_id).await
    }

    async fn get_template_boards(&self, team_id: EntityId) -> Result<Vec<Board>, sqlx::Error> {
        BoardRepo::list_templates(&self.pool, team_id).await
    }

    async fn search_boards_for_user_and_team(
        &self,
        term: &str,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<Vec<Board>, sqlx::Error> {
        BoardRepo::search_for_user_and_team(&self.pool, term, user_id, team_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn member(user: u128, admin: bool) -> BoardMember {
        let mut m = BoardMember::admin(Uuid::from_u128(1), Uuid::from_u128(user));
        m.scheme_admin = admin;
        m
    }

    #[test]
    fn unchecked_guard_never_refuses() {
        let members = vec![member(1, true)];
        assert!(!guard_refuses(AdminGuard::Unchecked, &members, Uuid::from_u128(1)));
    }

    #[test]
    fn guard_refuses_sole_admin() {
        let members = vec![member(1, true), member(2, false)];
        assert!(guard_refuses(
            AdminGuard::RequireOtherAdmin,
            &members,
            Uuid::from_u128(1)
        ));
    }

    #[test]
    fn guard_allows_when_another_admin_exists() {
        let members = vec![member(1, true), member(2, true)];
        assert!(!guard_refuses(
            AdminGuard::RequireOtherAdmin,
            &members,
            Uuid::from_u128(1)
        ));
    }
}
