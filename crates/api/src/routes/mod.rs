pub mod boards;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers::members;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                                       WebSocket
///
/// /teams/{team_id}/boards                   boards visible to the caller (?q=)
/// /teams/{team_id}/templates                template boards
///
/// /boards                                   create
/// /boards/{id}                              get, patch, delete
/// /boards/{id}/duplicate                    duplicate (POST)
/// /boards/{id}/metadata                     reconstructed provenance
/// /boards/{id}/members                      list, add
/// /boards/{id}/members/{user_id}            update, remove
///
/// /users/me/memberships                     memberships of the caller
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/teams/{team_id}", boards::team_router())
        .nest("/boards", boards::router())
        .route("/users/me/memberships", get(members::my_memberships))
}
