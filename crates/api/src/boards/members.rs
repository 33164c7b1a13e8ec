//! Membership operations and the admin quorum gate.
//!
//! A board with members always keeps at least one admin. Demotions and
//! removals of an admin are checked against the current membership before
//! the write, and the store re-checks under a row lock inside the write
//! transaction so two concurrent demotions cannot both pass.

use boardhub_core::error::CoreError;
use boardhub_core::quorum;
use boardhub_core::types::EntityId;
use boardhub_db::models::board_member::BoardMember;
use boardhub_db::{AdminGuard, MemberWrite};

use super::error::StoreContext;
use super::{BoardResult, BoardService};

impl BoardService {
    pub async fn get_members_for_board(&self, board_id: EntityId) -> BoardResult<Vec<BoardMember>> {
        self.store
            .get_members_for_board(board_id)
            .await
            .context("could not get members for board")
    }

    pub async fn get_members_for_user(&self, user_id: EntityId) -> BoardResult<Vec<BoardMember>> {
        self.store
            .get_members_for_user(user_id)
            .await
            .context("could not get memberships for user")
    }

    /// Whether `user_id` belongs to the team through at least one board
    /// membership. Gates real-time subscriptions to a team's events.
    pub async fn is_member_of_team(&self, user_id: EntityId, team_id: EntityId) -> BoardResult<bool> {
        self.store
            .is_member_of_team(user_id, team_id)
            .await
            .context("could not check team membership")
    }

    /// Whether removing or demoting `candidate` would leave `board_id`
    /// without an admin.
    pub async fn would_violate_admin_quorum(
        &self,
        board_id: EntityId,
        candidate: EntityId,
    ) -> BoardResult<bool> {
        let members = self.get_members_for_board(board_id).await?;
        Ok(quorum::is_last_admin(
            members.iter().map(|m| (m.user_id, m.scheme_admin)),
            candidate,
        ))
    }

    /// Add a member. An existing membership is returned unchanged.
    ///
    /// Returns `None` when the board does not exist.
    pub async fn add_member_to_board(
        &self,
        member: BoardMember,
    ) -> BoardResult<Option<BoardMember>> {
        member.check_enums().map_err(CoreError::Validation)?;
        let Some(board) = self.get_board(member.board_id).await? else {
            return Ok(None);
        };

        if let Some(existing) = self
            .store
            .get_member_for_board(member.board_id, member.user_id)
            .await
            .context("could not get member for board")?
        {
            return Ok(Some(existing));
        }

        let saved = match self
            .store
            .save_member(&member, AdminGuard::Unchecked)
            .await
            .context("could not save member")?
        {
            MemberWrite::Applied(saved) => saved,
            MemberWrite::LastAdmin => {
                return Err(CoreError::LastBoardAdmin {
                    board_id: member.board_id,
                }
                .into())
            }
        };

        self.events.broadcast_member_change(board.team_id, saved.clone());
        tracing::info!(
            board_id = %saved.board_id,
            team_id = %board.team_id,
            user_id = %saved.user_id,
            "Member added to board"
        );
        Ok(Some(saved))
    }

    /// Overwrite a member's roles.
    ///
    /// Returns `None` when the board or the membership does not exist.
    pub async fn update_board_member(
        &self,
        member: BoardMember,
    ) -> BoardResult<Option<BoardMember>> {
        member.check_enums().map_err(CoreError::Validation)?;
        let Some(board) = self.get_board(member.board_id).await? else {
            return Ok(None);
        };
        let Some(old) = self
            .store
            .get_member_for_board(member.board_id, member.user_id)
            .await
            .context("could not get member for board")?
        else {
            return Ok(None);
        };

        let guard = if quorum::update_requires_check(old.scheme_admin, member.scheme_admin) {
            if self
                .would_violate_admin_quorum(member.board_id, member.user_id)
                .await?
            {
                return Err(CoreError::LastBoardAdmin {
                    board_id: member.board_id,
                }
                .into());
            }
            AdminGuard::RequireOtherAdmin
        } else {
            AdminGuard::Unchecked
        };

        let saved = match self
            .store
            .save_member(&member, guard)
            .await
            .context("could not save member")?
        {
            MemberWrite::Applied(saved) => saved,
            MemberWrite::LastAdmin => {
                return Err(CoreError::LastBoardAdmin {
                    board_id: member.board_id,
                }
                .into())
            }
        };

        self.events.broadcast_member_change(board.team_id, saved.clone());
        tracing::info!(
            board_id = %saved.board_id,
            team_id = %board.team_id,
            user_id = %saved.user_id,
            scheme_admin = saved.scheme_admin,
            "Board member updated"
        );
        Ok(Some(saved))
    }

    /// Remove a member. Missing boards and memberships are ignored.
    pub async fn delete_board_member(
        &self,
        board_id: EntityId,
        user_id: EntityId,
    ) -> BoardResult<()> {
        let Some(board) = self.get_board(board_id).await? else {
            return Ok(());
        };
        let Some(member) = self
            .store
            .get_member_for_board(board_id, user_id)
            .await
            .context("could not get member for board")?
        else {
            return Ok(());
        };

        let guard = if quorum::removal_requires_check(member.scheme_admin) {
            if self.would_violate_admin_quorum(board_id, user_id).await? {
                return Err(CoreError::LastBoardAdmin { board_id }.into());
            }
            AdminGuard::RequireOtherAdmin
        } else {
            AdminGuard::Unchecked
        };

        match self
            .store
            .delete_member(board_id, user_id, guard)
            .await
            .context("could not delete member")?
        {
            MemberWrite::Applied(()) => {}
            MemberWrite::LastAdmin => return Err(CoreError::LastBoardAdmin { board_id }.into()),
        }

        self.events.broadcast_member_delete(board.team_id, member);
        tracing::info!(%board_id, team_id = %board.team_id, %user_id, "Member removed from board");
        Ok(())
    }
}
