//! Board entity model and DTOs.

use boardhub_core::roles::{board_types, is_valid_board_type, is_valid_minimum_role};
use boardhub_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use validator::Validate;

/// A board row from the `boards` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Board {
    pub id: EntityId,
    pub team_id: EntityId,
    pub channel_id: Option<EntityId>,
    pub created_by: EntityId,
    pub modified_by: EntityId,
    /// `"O"` (open) or `"P"` (private).
    pub board_type: String,
    pub minimum_role: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub show_description: bool,
    pub is_template: bool,
    pub template_version: i32,
    /// Free-form JSON object of board-level properties.
    pub properties: Value,
    /// JSON array describing the card property templates.
    pub card_properties: Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Board {
    /// Build the row for a newly created board.
    ///
    /// The caller supplies the id; `input.id` is ignored here and must be
    /// rejected before this point.
    pub fn from_create(id: EntityId, input: &CreateBoard, user_id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            team_id: input.team_id,
            channel_id: input.channel_id,
            created_by: user_id,
            modified_by: user_id,
            board_type: input
                .board_type
                .clone()
                .unwrap_or_else(|| board_types::OPEN.to_string()),
            minimum_role: input.minimum_role.clone().unwrap_or_default(),
            title: input.title.clone().unwrap_or_default(),
            description: input.description.clone().unwrap_or_default(),
            icon: input.icon.clone().unwrap_or_default(),
            show_description: input.show_description.unwrap_or(false),
            is_template: input.is_template.unwrap_or(false),
            template_version: input.template_version.unwrap_or(0),
            properties: input
                .properties
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default())),
            card_properties: input
                .card_properties
                .clone()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            created_at: now,
            updated_at: now,
        }
    }
}

/// DTO for creating a new board.
///
/// `id` exists only so that a client-supplied id can be detected and
/// rejected; ids are always assigned by the server.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateBoard {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub team_id: EntityId,
    pub channel_id: Option<EntityId>,
    /// Defaults to `"O"` (open) if omitted.
    pub board_type: Option<String>,
    pub minimum_role: Option<String>,
    #[validate(length(max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 64))]
    pub icon: Option<String>,
    pub show_description: Option<bool>,
    pub is_template: Option<bool>,
    pub template_version: Option<i32>,
    pub properties: Option<Value>,
    pub card_properties: Option<Value>,
}

impl CreateBoard {
    /// Checks that the derive-based validation cannot express.
    pub fn check_enums(&self) -> Result<(), String> {
        check_board_type(self.board_type.as_deref())?;
        check_minimum_role(self.minimum_role.as_deref())
    }
}

/// A partial update to a board. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BoardPatch {
    pub board_type: Option<String>,
    pub minimum_role: Option<String>,
    #[validate(length(max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 64))]
    pub icon: Option<String>,
    pub show_description: Option<bool>,
    pub channel_id: Option<EntityId>,
    /// Keys merged into `properties`.
    #[serde(default)]
    pub updated_properties: serde_json::Map<String, Value>,
    /// Keys removed from `properties`.
    #[serde(default)]
    pub deleted_properties: Vec<String>,
    /// Replaces `card_properties` wholesale.
    pub updated_card_properties: Option<Value>,
}

impl BoardPatch {
    pub fn check_enums(&self) -> Result<(), String> {
        check_board_type(self.board_type.as_deref())?;
        check_minimum_role(self.minimum_role.as_deref())
    }

    /// Apply the patch to `board` in place. Audit fields are left to the caller.
    pub fn apply_to(&self, board: &mut Board) {
        if let Some(board_type) = &self.board_type {
            board.board_type = board_type.clone();
        }
        if let Some(minimum_role) = &self.minimum_role {
            board.minimum_role = minimum_role.clone();
        }
        if let Some(title) = &self.title {
            board.title = title.clone();
        }
        if let Some(description) = &self.description {
            board.description = description.clone();
        }
        if let Some(icon) = &self.icon {
            board.icon = icon.clone();
        }
        if let Some(show_description) = self.show_description {
            board.show_description = show_description;
        }
        if let Some(channel_id) = self.channel_id {
            board.channel_id = Some(channel_id);
        }

        if !self.updated_properties.is_empty() || !self.deleted_properties.is_empty() {
            if !board.properties.is_object() {
                board.properties = Value::Object(Default::default());
            }
            if let Value::Object(props) = &mut board.properties {
                for (key, value) in &self.updated_properties {
                    props.insert(key.clone(), value.clone());
                }
                for key in &self.deleted_properties {
                    props.remove(key);
                }
            }
        }

        if let Some(card_properties) = &self.updated_card_properties {
            board.card_properties = card_properties.clone();
        }
    }
}

fn check_board_type(board_type: Option<&str>) -> Result<(), String> {
    match board_type {
        Some(t) if !is_valid_board_type(t) => Err(format!("Invalid board_type '{t}'")),
        _ => Ok(()),
    }
}

fn check_minimum_role(role: Option<&str>) -> Result<(), String> {
    match role {
        Some(r) if !is_valid_minimum_role(r) => Err(format!("Invalid minimum_role '{r}'")),
        _ => Ok(()),
    }
}
