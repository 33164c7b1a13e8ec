//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` input DTOs for inserts and patches where the API accepts them

pub mod block;
pub mod board;
pub mod board_member;
pub mod history;
