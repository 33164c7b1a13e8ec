//! Board provenance rebuilt from history.
//!
//! Works for deleted boards too: when the live row is gone the newest
//! history snapshot stands in for it.

use boardhub_core::error::CoreError;
use boardhub_core::provenance::{supersede, ActivityMark, BoardMetadata, Direction};
use boardhub_core::types::EntityId;
use boardhub_db::models::board::Board;
use boardhub_db::models::history::HistoryQuery;

use super::error::StoreContext;
use super::{BoardResult, BoardService};

impl BoardService {
    /// Reconstruct who created the board and who touched it, and when,
    /// across the board and every block nested in it.
    ///
    /// Requires the compliance license feature. Returns `None` when neither
    /// a live board nor any history exists for `board_id`.
    pub async fn get_board_metadata(
        &self,
        board_id: EntityId,
    ) -> BoardResult<Option<(Board, BoardMetadata)>> {
        if !self.license.allows_compliance() {
            return Err(CoreError::InsufficientLicense.into());
        }

        let Some(board) = self.resolve_board(board_id).await? else {
            return Ok(None);
        };

        let earliest = self.activity_mark(board_id, Direction::Earliest).await?;
        let latest = self.activity_mark(board_id, Direction::Latest).await?;

        let metadata = BoardMetadata::assemble(board_id, board.created_by, earliest, latest);
        tracing::debug!(
            %board_id,
            first = %metadata.descendant_first_update_at,
            last = %metadata.descendant_last_update_at,
            "Board metadata rebuilt"
        );
        Ok(Some((board, metadata)))
    }

    /// The live board, or its newest snapshot if it has been deleted.
    async fn resolve_board(&self, board_id: EntityId) -> BoardResult<Option<Board>> {
        if let Some(board) = self.get_board(board_id).await? {
            return Ok(Some(board));
        }

        let newest = self
            .store
            .get_board_history(board_id, HistoryQuery::last())
            .await
            .context("could not get history for board")?;
        Ok(newest.into_iter().next().map(|h| h.board))
    }

    /// One end of the activity window: the board's own history row, unless a
    /// descendant block lies strictly beyond it.
    async fn activity_mark(
        &self,
        board_id: EntityId,
        direction: Direction,
    ) -> BoardResult<ActivityMark> {
        let query = if direction.descending() {
            HistoryQuery::last()
        } else {
            HistoryQuery::first()
        };

        let board_row = self
            .store
            .get_board_history(board_id, query)
            .await
            .context("could not get history for board")?
            .into_iter()
            .next()
            .ok_or(CoreError::HistoryNotFound { board_id })?;
        let board_mark = match direction {
            Direction::Earliest => ActivityMark {
                at: board_row.board.created_at,
                by: board_row.board.modified_by,
            },
            Direction::Latest => ActivityMark {
                at: board_row.board.updated_at,
                by: board_row.board.modified_by,
            },
        };

        let block_mark = self
            .store
            .get_block_history_descendants(board_id, query)
            .await
            .context("could not get block history for board")?
            .into_iter()
            .next()
            .map(|row| match direction {
                Direction::Earliest => ActivityMark {
                    at: row.block.created_at,
                    by: row.block.modified_by,
                },
                Direction::Latest => ActivityMark {
                    at: row.block.updated_at,
                    by: row.block.modified_by,
                },
            });

        Ok(supersede(direction, board_mark, block_mark))
    }
}
