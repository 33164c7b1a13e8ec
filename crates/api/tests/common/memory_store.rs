//! In-memory [`BoardStore`] for exercising `BoardService` without Postgres.
//!
//! Mirrors the Postgres store's observable behavior: history is appended on
//! every board write, deletes keep history, guarded member writes re-check
//! the quorum. It also counts mutating calls so tests can assert that a
//! rejected operation never reached the store.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use boardhub_core::ids::new_id;
use boardhub_core::quorum;
use boardhub_core::types::EntityId;
use boardhub_db::models::block::Block;
use boardhub_db::models::board::{Board, BoardPatch, CreateBoard};
use boardhub_db::models::board_member::BoardMember;
use boardhub_db::models::history::{BlockHistory, BoardHistory, HistoryQuery};
use boardhub_db::store::DuplicatedBoard;
use boardhub_db::{AdminGuard, BoardStore, MemberWrite};
use chrono::Utc;

#[derive(Default)]
struct Inner {
    boards: HashMap<EntityId, Board>,
    blocks: HashMap<EntityId, Block>,
    members: Members,
    board_history: Vec<BoardHistory>,
    block_history: Vec<BlockHistory>,
    next_history_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_history_id += 1;
        self.next_history_id
    }

    fn snapshot_board(&mut self, board: &Board, deleted: bool) {
        let history_id = self.next_id();
        self.board_history.push(BoardHistory {
            history_id,
            board: board.clone(),
            deleted_at: deleted.then_some(board.updated_at),
        });
    }

    fn snapshot_block(&mut self, block: &Block, deleted: bool) {
        let history_id = self.next_id();
        self.block_history.push(BlockHistory {
            history_id,
            block: block.clone(),
            deleted_at: deleted.then_some(block.updated_at),
        });
    }

    fn members_of(&self, board_id: EntityId) -> Vec<BoardMember> {
        self.members
            .values()
            .filter(|m| m.board_id == board_id)
            .cloned()
            .collect()
    }

    fn guard_refuses(&self, guard: AdminGuard, board_id: EntityId, user_id: EntityId) -> bool {
        guard == AdminGuard::RequireOtherAdmin
            && quorum::is_last_admin(
                self.members_of(board_id)
                    .iter()
                    .map(|m| (m.user_id, m.scheme_admin)),
                user_id,
            )
    }
}

fn bounded<T: Clone>(mut rows: Vec<T>, key: impl Fn(&T) -> (chrono::DateTime<Utc>, i64), query: HistoryQuery) -> Vec<T> {
    rows.sort_by_key(|r| key(r));
    if query.descending {
        rows.reverse();
    }
    rows.truncate(usize::try_from(query.limit).unwrap_or(0));
    rows
}

/// Memberships keyed by `(board_id, user_id)`.
pub type Members = BTreeMap<(EntityId, EntityId), BoardMember>;

type MemberHook = Box<dyn FnOnce(&mut Members) + Send>;

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    writes: AtomicUsize,
    before_member_write: Mutex<Option<MemberHook>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mutating store calls made so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn wrote(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    /// Seed a live board without writing any history.
    pub fn seed_board_without_history(&self, board: Board) {
        self.inner.lock().unwrap().boards.insert(board.id, board);
    }

    /// Seed a membership directly, bypassing the write counter.
    pub fn seed_member(&self, member: BoardMember) {
        self.inner
            .lock()
            .unwrap()
            .members
            .insert((member.board_id, member.user_id), member);
    }

    /// Append a board history row with explicit contents.
    pub fn seed_board_history(&self, board: Board, deleted: bool) {
        self.inner.lock().unwrap().snapshot_board(&board, deleted);
    }

    /// Append a block history row with explicit contents.
    pub fn seed_block_history(&self, block: Block) {
        self.inner.lock().unwrap().snapshot_block(&block, false);
    }

    pub fn members(&self, board_id: EntityId) -> Vec<BoardMember> {
        self.inner.lock().unwrap().members_of(board_id)
    }

    /// Run `hook` against the memberships at the start of the next
    /// `save_member` or `delete_member`, after any service-side checks, to
    /// simulate a concurrent writer.
    pub fn before_next_member_write(&self, hook: impl FnOnce(&mut Members) + Send + 'static) {
        *self.before_member_write.lock().unwrap() = Some(Box::new(hook));
    }

    fn run_member_hook(&self, inner: &mut Inner) {
        if let Some(hook) = self.before_member_write.lock().unwrap().take() {
            hook(&mut inner.members);
        }
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn get_board(&self, id: EntityId) -> Result<Option<Board>, sqlx::Error> {
        Ok(self.inner.lock().unwrap().boards.get(&id).cloned())
    }

    async fn get_board_history(
        &self,
        board_id: EntityId,
        query: HistoryQuery,
    ) -> Result<Vec<BoardHistory>, sqlx::Error> {
        let rows: Vec<_> = self
            .inner
            .lock()
            .unwrap()
            .board_history
            .iter()
            .filter(|h| h.board.id == board_id)
            .cloned()
            .collect();
        Ok(bounded(rows, |h| (h.board.updated_at, h.history_id), query))
    }

    async fn get_block_history_descendants(
        &self,
        board_id: EntityId,
        query: HistoryQuery,
    ) -> Result<Vec<BlockHistory>, sqlx::Error> {
        let rows: Vec<_> = self
            .inner
            .lock()
            .unwrap()
            .block_history
            .iter()
            .filter(|h| h.block.board_id == board_id)
            .cloned()
            .collect();
        Ok(bounded(rows, |h| (h.block.updated_at, h.history_id), query))
    }

    async fn insert_board(
        &self,
        id: EntityId,
        input: &CreateBoard,
        user_id: EntityId,
    ) -> Result<Board, sqlx::Error> {
        self.wrote();
        let board = Board::from_create(id, input, user_id, Utc::now());
        let mut inner = self.inner.lock().unwrap();
        inner.boards.insert(id, board.clone());
        inner.snapshot_board(&board, false);
        Ok(board)
    }

    async fn insert_board_with_admin(
        &self,
        id: EntityId,
        input: &CreateBoard,
        user_id: EntityId,
    ) -> Result<(Board, BoardMember), sqlx::Error> {
        self.wrote();
        let board = Board::from_create(id, input, user_id, Utc::now());
        let member = BoardMember::admin(id, user_id);
        let mut inner = self.inner.lock().unwrap();
        inner.boards.insert(id, board.clone());
        inner.snapshot_board(&board, false);
        inner.members.insert((id, user_id), member.clone());
        Ok((board, member))
    }

    async fn patch_board(
        &self,
        id: EntityId,
        patch: &BoardPatch,
        user_id: EntityId,
    ) -> Result<Option<Board>, sqlx::Error> {
        self.wrote();
        let mut inner = self.inner.lock().unwrap();
        let Some(mut board) = inner.boards.get(&id).cloned() else {
            return Ok(None);
        };
        patch.apply_to(&mut board);
        board.modified_by = user_id;
        board.updated_at = Utc::now();
        inner.boards.insert(id, board.clone());
        inner.snapshot_board(&board, false);
        Ok(Some(board))
    }

    async fn delete_board(&self, id: EntityId, user_id: EntityId) -> Result<bool, sqlx::Error> {
        self.wrote();
        let now = Utc::now();
        let mut inner = self.inner.lock().unwrap();
        let Some(mut board) = inner.boards.remove(&id) else {
            return Ok(false);
        };
        let blocks: Vec<Block> = inner
            .blocks
            .values()
            .filter(|b| b.board_id == id)
            .cloned()
            .collect();
        for mut block in blocks {
            inner.blocks.remove(&block.id);
            block.modified_by = user_id;
            block.updated_at = now;
            inner.snapshot_block(&block, true);
        }
        board.modified_by = user_id;
        board.updated_at = now;
        inner.snapshot_board(&board, true);
        inner.members.retain(|(board_id, _), _| *board_id != id);
        Ok(true)
    }

    async fn get_member_for_board(
        &self,
        board_id: EntityId,
        user_id: EntityId,
    ) -> Result<Option<BoardMember>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .members
            .get(&(board_id, user_id))
            .cloned())
    }

    async fn get_members_for_board(
        &self,
        board_id: EntityId,
    ) -> Result<Vec<BoardMember>, sqlx::Error> {
        Ok(self.inner.lock().unwrap().members_of(board_id))
    }

    async fn get_members_for_user(
        &self,
        user_id: EntityId,
    ) -> Result<Vec<BoardMember>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .members
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn is_member_of_team(
        &self,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<bool, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.members.keys().any(|(board_id, member)| {
            *member == user_id
                && inner
                    .boards
                    .get(board_id)
                    .is_some_and(|b| b.team_id == team_id)
        }))
    }

    async fn save_member(
        &self,
        member: &BoardMember,
        guard: AdminGuard,
    ) -> Result<MemberWrite<BoardMember>, sqlx::Error> {
        self.wrote();
        let mut inner = self.inner.lock().unwrap();
        self.run_member_hook(&mut inner);
        if inner.guard_refuses(guard, member.board_id, member.user_id) {
            return Ok(MemberWrite::LastAdmin);
        }
        inner
            .members
            .insert((member.board_id, member.user_id), member.clone());
        Ok(MemberWrite::Applied(member.clone()))
    }

    async fn delete_member(
        &self,
        board_id: EntityId,
        user_id: EntityId,
        guard: AdminGuard,
    ) -> Result<MemberWrite<()>, sqlx::Error> {
        self.wrote();
        let mut inner = self.inner.lock().unwrap();
        self.run_member_hook(&mut inner);
        if inner.guard_refuses(guard, board_id, user_id) {
            return Ok(MemberWrite::LastAdmin);
        }
        inner.members.remove(&(board_id, user_id));
        Ok(MemberWrite::Applied(()))
    }

    async fn duplicate_board(
        &self,
        id: EntityId,
        user_id: EntityId,
        to_team: Option<EntityId>,
        as_template: bool,
    ) -> Result<Option<DuplicatedBoard>, sqlx::Error> {
        self.wrote();
        let now = Utc::now();
        let mut inner = self.inner.lock().unwrap();
        let Some(source) = inner.boards.get(&id).cloned() else {
            return Ok(None);
        };

        let board = Board {
            id: new_id(),
            team_id: to_team.unwrap_or(source.team_id),
            created_by: user_id,
            modified_by: user_id,
            is_template: as_template,
            created_at: now,
            updated_at: now,
            ..source
        };
        inner.boards.insert(board.id, board.clone());
        inner.snapshot_board(&board, false);

        let member = BoardMember::admin(board.id, user_id);
        inner.members.insert((board.id, user_id), member.clone());

        Ok(Some(DuplicatedBoard {
            boards: vec![board],
            blocks: Vec::new(),
            members: vec![member],
        }))
    }

    async fn get_boards_for_user_and_team(
        &self,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<Vec<Board>, sqlx::Error> {
        self.search_boards_for_user_and_team("", user_id, team_id)
            .await
    }

    async fn get_template_boards(&self, team_id: EntityId) -> Result<Vec<Board>, sqlx::Error> {
        let mut boards: Vec<_> = self
            .inner
            .lock()
            .unwrap()
            .boards
            .values()
            .filter(|b| b.team_id == team_id && b.is_template)
            .cloned()
            .collect();
        boards.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(boards)
    }

    async fn search_boards_for_user_and_team(
        &self,
        term: &str,
        user_id: EntityId,
        team_id: EntityId,
    ) -> Result<Vec<Board>, sqlx::Error> {
        let term = term.to_lowercase();
        let inner = self.inner.lock().unwrap();
        let mut boards: Vec<_> = inner
            .boards
            .values()
            .filter(|b| b.team_id == team_id && !b.is_template)
            .filter(|b| b.board_type == "O" || inner.members.contains_key(&(b.id, user_id)))
            .filter(|b| b.title.to_lowercase().contains(&term))
            .cloned()
            .collect();
        boards.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(boards)
    }
}
