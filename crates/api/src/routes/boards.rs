//! Route definitions for boards and their members.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{boards, members};
use crate::state::AppState;

/// Routes mounted at `/boards`.
///
/// ```text
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PATCH  /{id}                      -> patch
/// DELETE /{id}                      -> delete
/// POST   /{id}/duplicate            -> duplicate
/// GET    /{id}/metadata             -> metadata
/// GET    /{id}/members              -> members::list
/// POST   /{id}/members              -> members::add
/// PUT    /{id}/members/{user_id}    -> members::update
/// DELETE /{id}/members/{user_id}    -> members::remove
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(boards::create))
        .route(
            "/{id}",
            get(boards::get_by_id)
                .patch(boards::patch)
                .delete(boards::delete),
        )
        .route("/{id}/duplicate", post(boards::duplicate))
        .route("/{id}/metadata", get(boards::metadata))
        .route("/{id}/members", get(members::list).post(members::add))
        .route(
            "/{id}/members/{user_id}",
            put(members::update).delete(members::remove),
        )
}

/// Routes mounted at `/teams/{team_id}`.
///
/// ```text
/// GET    /boards                    -> list_for_team
/// GET    /templates                 -> list_templates
/// ```
pub fn team_router() -> Router<AppState> {
    Router::new()
        .route("/boards", get(boards::list_for_team))
        .route("/templates", get(boards::list_templates))
}
