//! Handlers for board membership.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use boardhub_core::error::CoreError;
use boardhub_core::types::EntityId;
use boardhub_db::models::board_member::{AddBoardMember, BoardMember, MemberRoles};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/boards/{id}/members
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Vec<BoardMember>>>> {
    let members = state.boards.get_members_for_board(board_id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/boards/{id}/members
///
/// Adding an existing member returns the current membership unchanged.
pub async fn add(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<EntityId>,
    Json(input): Json<AddBoardMember>,
) -> AppResult<Json<DataResponse<BoardMember>>> {
    let member = BoardMember::new(board_id, input.user_id, input.roles);
    let member = state
        .boards
        .add_member_to_board(member)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Board",
            id: board_id,
        }))?;
    Ok(Json(DataResponse { data: member }))
}

/// PUT /api/v1/boards/{id}/members/{user_id}
pub async fn update(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, user_id)): Path<(EntityId, EntityId)>,
    Json(roles): Json<MemberRoles>,
) -> AppResult<Json<DataResponse<BoardMember>>> {
    let member = state
        .boards
        .update_board_member(BoardMember::new(board_id, user_id, roles))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BoardMember",
            id: user_id,
        }))?;
    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/boards/{id}/members/{user_id}
pub async fn remove(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, user_id)): Path<(EntityId, EntityId)>,
) -> AppResult<StatusCode> {
    state.boards.delete_board_member(board_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/me/memberships
pub async fn my_memberships(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<BoardMember>>>> {
    let members = state.boards.get_members_for_user(auth.user_id).await?;
    Ok(Json(DataResponse { data: members }))
}
