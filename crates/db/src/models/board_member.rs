//! Board membership model and DTOs.

use boardhub_core::roles::is_valid_minimum_role;
use boardhub_core::types::EntityId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `board_members` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct BoardMember {
    pub board_id: EntityId,
    pub user_id: EntityId,
    pub minimum_role: String,
    /// Board administrator. Every board with members keeps at least one.
    pub scheme_admin: bool,
    pub scheme_editor: bool,
    pub scheme_commenter: bool,
    pub scheme_viewer: bool,
}

impl BoardMember {
    pub fn new(board_id: EntityId, user_id: EntityId, roles: MemberRoles) -> Self {
        Self {
            board_id,
            user_id,
            minimum_role: roles.minimum_role,
            scheme_admin: roles.scheme_admin,
            scheme_editor: roles.scheme_editor,
            scheme_commenter: roles.scheme_commenter,
            scheme_viewer: roles.scheme_viewer,
        }
    }

    /// Reject a `minimum_role` outside the known role set.
    pub fn check_enums(&self) -> Result<(), String> {
        if is_valid_minimum_role(&self.minimum_role) {
            Ok(())
        } else {
            Err(format!("Invalid minimum_role '{}'", self.minimum_role))
        }
    }

    /// A member holding every scheme role, as granted to a board's creator.
    pub fn admin(board_id: EntityId, user_id: EntityId) -> Self {
        Self::new(
            board_id,
            user_id,
            MemberRoles {
                minimum_role: String::new(),
                scheme_admin: true,
                scheme_editor: true,
                scheme_commenter: true,
                scheme_viewer: true,
            },
        )
    }
}

/// Role flags accepted when adding or updating a member.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberRoles {
    #[serde(default)]
    pub minimum_role: String,
    #[serde(default)]
    pub scheme_admin: bool,
    #[serde(default)]
    pub scheme_editor: bool,
    #[serde(default)]
    pub scheme_commenter: bool,
    #[serde(default)]
    pub scheme_viewer: bool,
}

/// DTO for adding a user to a board.
#[derive(Debug, Clone, Deserialize)]
pub struct AddBoardMember {
    pub user_id: EntityId,
    #[serde(flatten)]
    pub roles: MemberRoles,
}
