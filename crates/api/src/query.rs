//! Query parameter types shared by board handlers.

use boardhub_core::types::EntityId;
use serde::Deserialize;

/// `?q=` on team board listings.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// `?add_member=` on board creation. Defaults to `true`.
#[derive(Debug, Deserialize)]
pub struct CreateBoardParams {
    #[serde(default = "default_true")]
    pub add_member: bool,
}

impl Default for CreateBoardParams {
    fn default() -> Self {
        Self { add_member: true }
    }
}

/// `?to_team=&as_template=` on board duplication.
#[derive(Debug, Default, Deserialize)]
pub struct DuplicateParams {
    pub to_team: Option<EntityId>,
    #[serde(default)]
    pub as_template: bool,
}

fn default_true() -> bool {
    true
}
