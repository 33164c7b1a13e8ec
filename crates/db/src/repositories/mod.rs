//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Standalone reads accept `&PgPool`; anything that must share a
//! transaction with other writes accepts `&mut PgConnection`.

pub mod block_history_repo;
pub mod block_repo;
pub mod board_history_repo;
pub mod board_member_repo;
pub mod board_repo;

pub use block_history_repo::BlockHistoryRepo;
pub use block_repo::BlockRepo;
pub use board_history_repo::BoardHistoryRepo;
pub use board_member_repo::BoardMemberRepo;
pub use board_repo::BoardRepo;
