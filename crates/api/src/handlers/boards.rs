//! Handlers for the `/boards` and `/teams/{team_id}/...` board resources.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use boardhub_core::error::CoreError;
use boardhub_core::provenance::BoardMetadata;
use boardhub_core::types::EntityId;
use boardhub_db::models::board::{Board, BoardPatch, CreateBoard};
use boardhub_db::store::DuplicatedBoard;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{CreateBoardParams, DuplicateParams, SearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// A board together with its reconstructed provenance.
#[derive(Debug, Serialize)]
pub struct BoardWithMetadata {
    pub board: Board,
    pub metadata: BoardMetadata,
}

fn board_not_found(id: EntityId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Board", id })
}

/// GET /api/v1/teams/{team_id}/boards
pub async fn list_for_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<EntityId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<Board>>>> {
    let boards = match params.q.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => {
            state
                .boards
                .search_boards_for_user_and_team(term, auth.user_id, team_id)
                .await?
        }
        _ => {
            state
                .boards
                .get_boards_for_user_and_team(auth.user_id, team_id)
                .await?
        }
    };
    Ok(Json(DataResponse { data: boards }))
}

/// GET /api/v1/teams/{team_id}/templates
pub async fn list_templates(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Vec<Board>>>> {
    let boards = state.boards.get_template_boards(team_id).await?;
    Ok(Json(DataResponse { data: boards }))
}

/// POST /api/v1/boards
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CreateBoardParams>,
    Json(input): Json<CreateBoard>,
) -> AppResult<(StatusCode, Json<DataResponse<Board>>)> {
    let board = state
        .boards
        .create_board(input, auth.user_id, params.add_member)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: board })))
}

/// GET /api/v1/boards/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Board>>> {
    let board = state
        .boards
        .get_board(id)
        .await?
        .ok_or_else(|| board_not_found(id))?;
    Ok(Json(DataResponse { data: board }))
}

/// PATCH /api/v1/boards/{id}
pub async fn patch(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(input): Json<BoardPatch>,
) -> AppResult<Json<DataResponse<Board>>> {
    let board = state
        .boards
        .patch_board(id, input, auth.user_id)
        .await?
        .ok_or_else(|| board_not_found(id))?;
    Ok(Json(DataResponse { data: board }))
}

/// DELETE /api/v1/boards/{id}
///
/// Idempotent: deleting a missing board also answers 204.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.boards.delete_board(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/boards/{id}/duplicate
pub async fn duplicate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Query(params): Query<DuplicateParams>,
) -> AppResult<(StatusCode, Json<DataResponse<DuplicatedBoard>>)> {
    let duplicated = state
        .boards
        .duplicate_board(id, auth.user_id, params.to_team, params.as_template)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: duplicated })))
}

/// GET /api/v1/boards/{id}/metadata
pub async fn metadata(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<BoardWithMetadata>>> {
    let (board, metadata) = state
        .boards
        .get_board_metadata(id)
        .await?
        .ok_or_else(|| board_not_found(id))?;
    Ok(Json(DataResponse {
        data: BoardWithMetadata { board, metadata },
    }))
}
