//! Admin quorum rules for board membership.
//!
//! A board that has members must always keep at least one administrator.
//! These predicates are pure so the API layer (pre-write check) and the
//! store (in-transaction re-check) evaluate exactly the same rule.

use crate::types::EntityId;

/// Returns `true` when no member other than `candidate` holds the admin flag.
///
/// `members` yields `(user_id, is_admin)` pairs for the board's current
/// membership. Order does not matter. An empty membership counts as
/// "last admin" because nobody else could take over.
pub fn is_last_admin<I>(members: I, candidate: EntityId) -> bool
where
    I: IntoIterator<Item = (EntityId, bool)>,
{
    !members
        .into_iter()
        .any(|(user_id, is_admin)| is_admin && user_id != candidate)
}

/// An update only needs the quorum check when it demotes an admin.
pub fn update_requires_check(was_admin: bool, will_be_admin: bool) -> bool {
    was_admin && !will_be_admin
}

/// A removal only needs the quorum check when the removed member is an admin.
pub fn removal_requires_check(was_admin: bool) -> bool {
    was_admin
}
