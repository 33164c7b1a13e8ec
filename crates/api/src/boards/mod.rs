//! Board service: the mutation orchestrator in front of the store.
//!
//! Every mutation writes through [`BoardStore`] first and only then
//! publishes on the [`EventBus`]. Publishing never blocks and its outcome
//! never reaches the caller. Membership changes go through the admin quorum
//! gate in [`members`]; provenance reads live in [`metadata`].

mod error;
pub mod members;
pub mod metadata;

use std::sync::Arc;

use boardhub_core::error::CoreError;
use boardhub_core::ids::new_id;
use boardhub_core::license::LicenseProvider;
use boardhub_core::types::EntityId;
use boardhub_db::models::board::{Board, BoardPatch, CreateBoard};
use boardhub_db::store::DuplicatedBoard;
use boardhub_db::BoardStore;
use boardhub_events::EventBus;
use validator::Validate;

pub use error::{BoardError, BoardResult};
use error::StoreContext;

pub struct BoardService {
    store: Arc<dyn BoardStore>,
    license: Arc<dyn LicenseProvider>,
    events: Arc<EventBus>,
}

impl BoardService {
    pub fn new(
        store: Arc<dyn BoardStore>,
        license: Arc<dyn LicenseProvider>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            license,
            events,
        }
    }

    // -- reads --

    pub async fn get_board(&self, board_id: EntityId) -> BoardResult<Option<Board>> {
        self.store.get_board(board_id).await.context("could not get board")
    }

    pub async fn get_boards_for_user_and_team(
        &self,
        user_id: EntityId,
        team_id: EntityId,
    ) -> BoardResult<Vec<Board>> {
        self.store
            .get_boards_for_user_and_team(user_id, team_id)
            .await
            .context("could not list boards for team")
    }

    pub async fn get_template_boards(&self, team_id: EntityId) -> BoardResult<Vec<Board>> {
        self.store
            .get_template_boards(team_id)
            .await
            .context("could not list template boards")
    }

    pub async fn search_boards_for_user_and_team(
        &self,
        term: &str,
        user_id: EntityId,
        team_id: EntityId,
    ) -> BoardResult<Vec<Board>> {
        self.store
            .search_boards_for_user_and_team(term, user_id, team_id)
            .await
            .context("could not search boards")
    }

    // -- board mutations --

    /// Create a board with a server-assigned id, optionally making `user_id`
    /// its first admin.
    pub async fn create_board(
        &self,
        input: CreateBoard,
        user_id: EntityId,
        add_member: bool,
    ) -> BoardResult<Board> {
        if input.id.is_some_and(|id| !id.is_nil()) {
            return Err(CoreError::NewBoardCannotHaveId.into());
        }
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        input.check_enums().map_err(CoreError::Validation)?;

        let id = new_id();
        let board = if add_member {
            let (board, member) = self
                .store
                .insert_board_with_admin(id, &input, user_id)
                .await
                .context("could not insert board with admin")?;
            self.events.broadcast_board_change(board.team_id, board.clone());
            self.events.broadcast_member_change(board.team_id, member);
            board
        } else {
            let board = self
                .store
                .insert_board(id, &input, user_id)
                .await
                .context("could not insert board")?;
            self.events.broadcast_board_change(board.team_id, board.clone());
            board
        };

        tracing::info!(
            board_id = %board.id,
            team_id = %board.team_id,
            %user_id,
            add_member,
            "Board created"
        );
        Ok(board)
    }

    /// Apply a patch. Returns `None` when there is no live board to patch.
    pub async fn patch_board(
        &self,
        board_id: EntityId,
        patch: BoardPatch,
        user_id: EntityId,
    ) -> BoardResult<Option<Board>> {
        patch
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        patch.check_enums().map_err(CoreError::Validation)?;

        let Some(board) = self
            .store
            .patch_board(board_id, &patch, user_id)
            .await
            .context("could not patch board")?
        else {
            return Ok(None);
        };

        self.events.broadcast_board_change(board.team_id, board.clone());
        tracing::info!(%board_id, team_id = %board.team_id, %user_id, "Board patched");
        Ok(Some(board))
    }

    /// Delete a board. Deleting a missing board is a no-op.
    pub async fn delete_board(&self, board_id: EntityId, user_id: EntityId) -> BoardResult<()> {
        let Some(board) = self.get_board(board_id).await? else {
            tracing::debug!(%board_id, "Delete of missing board ignored");
            return Ok(());
        };

        let deleted = self
            .store
            .delete_board(board_id, user_id)
            .await
            .context("could not delete board")?;
        if deleted {
            self.events.broadcast_board_delete(board.team_id, board_id);
            tracing::info!(%board_id, team_id = %board.team_id, %user_id, "Board deleted");
        }
        Ok(())
    }

    /// Deep-copy a board and its blocks, into `to_team` when given.
    pub async fn duplicate_board(
        &self,
        board_id: EntityId,
        user_id: EntityId,
        to_team: Option<EntityId>,
        as_template: bool,
    ) -> BoardResult<DuplicatedBoard> {
        let duplicated = self
            .store
            .duplicate_board(board_id, user_id, to_team, as_template)
            .await
            .context("could not duplicate board")?
            .ok_or(CoreError::NotFound {
                entity: "Board",
                id: board_id,
            })?;

        // Every copy lands in one team.
        if let Some(team_id) = duplicated.boards.first().map(|b| b.team_id) {
            for board in &duplicated.boards {
                self.events.broadcast_board_change(team_id, board.clone());
            }
            for block in &duplicated.blocks {
                self.events.broadcast_block_change(team_id, block.clone());
            }
            for member in &duplicated.members {
                self.events.broadcast_member_change(team_id, member.clone());
            }
            tracing::info!(
                source_board_id = %board_id,
                %team_id,
                %user_id,
                as_template,
                blocks = duplicated.blocks.len(),
                "Board duplicated"
            );
        }

        Ok(duplicated)
    }
}
