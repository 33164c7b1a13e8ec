//! Identifier generation.
//!
//! New boards and blocks receive UUIDv7 identifiers so that ids sort in
//! creation order. Clients never supply their own.

use crate::types::EntityId;

/// Generate a fresh, time-ordered identifier.
pub fn new_id() -> EntityId {
    uuid::Uuid::now_v7()
}
