use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use boardhub_core::error::CoreError;
use serde_json::json;

use crate::boards::BoardError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`BoardError`] from the board
/// service. Produces a consistent `{ "error": ..., "code": ... }` JSON body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type ErrorParts = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Board(BoardError::Core(core)) => classify_core_error(core),
            AppError::Board(BoardError::Store { context, source }) => {
                tracing::error!(context = %context, error = %source, "Board store failure");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::NewBoardCannotHaveId => {
            (StatusCode::BAD_REQUEST, "NEW_BOARD_CANNOT_HAVE_ID", err.to_string())
        }
        CoreError::LastBoardAdmin { .. } => {
            (StatusCode::CONFLICT, "LAST_BOARD_ADMIN", err.to_string())
        }
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::InsufficientLicense => {
            (StatusCode::FORBIDDEN, "INSUFFICIENT_LICENSE", err.to_string())
        }
        CoreError::HistoryNotFound { board_id } => {
            tracing::error!(%board_id, "Board has no history rows");
            internal()
        }
    }
}
