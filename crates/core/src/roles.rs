//! Board visibility types and membership role names.

/// Board visibility types.
pub mod board_types {
    /// Visible to every member of the team.
    pub const OPEN: &str = "O";
    /// Visible only to explicit board members.
    pub const PRIVATE: &str = "P";
}

/// The set of all valid board types.
pub const VALID_BOARD_TYPES: &[&str] = &[board_types::OPEN, board_types::PRIVATE];

/// Minimum role names a board may grant implicitly. The empty string means
/// "no minimum".
pub mod minimum_roles {
    pub const NONE: &str = "";
    pub const VIEWER: &str = "viewer";
    pub const COMMENTER: &str = "commenter";
    pub const EDITOR: &str = "editor";
}

/// The set of all valid minimum roles.
pub const VALID_MINIMUM_ROLES: &[&str] = &[
    minimum_roles::NONE,
    minimum_roles::VIEWER,
    minimum_roles::COMMENTER,
    minimum_roles::EDITOR,
];

/// Returns `true` if the given board type is valid.
pub fn is_valid_board_type(board_type: &str) -> bool {
    VALID_BOARD_TYPES.contains(&board_type)
}

/// Returns `true` if the given minimum role is valid.
pub fn is_valid_minimum_role(role: &str) -> bool {
    VALID_MINIMUM_ROLES.contains(&role)
}
