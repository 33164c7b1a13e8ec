use boardhub_core::error::CoreError;

/// Errors returned by [`BoardService`](super::BoardService).
///
/// Domain outcomes (last admin, missing license, client-supplied id, broken
/// history) arrive as [`CoreError`]; infrastructure failures keep the
/// underlying sqlx error and name the operation that failed.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Attach an operation name to a store failure.
pub(crate) trait StoreContext<T> {
    fn context(self, context: &'static str) -> BoardResult<T>;
}

impl<T> StoreContext<T> for Result<T, sqlx::Error> {
    fn context(self, context: &'static str) -> BoardResult<T> {
        self.map_err(|source| BoardError::Store { context, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn context_wraps_store_failures() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::PoolTimedOut);
        let err = result.context("could not get board").unwrap_err();
        assert_matches!(err, BoardError::Store { context: "could not get board", .. });
        assert!(err.to_string().starts_with("could not get board: "));
    }

    #[test]
    fn core_errors_pass_through_unchanged() {
        let err = BoardError::from(CoreError::NewBoardCannotHaveId);
        assert_eq!(err.to_string(), "new board cannot have an ID");
    }
}
