//! PostgreSQL persistence for boards, memberships, blocks and their history.
//!
//! - [`models`] -- row structs and input DTOs.
//! - [`repositories`] -- zero-sized query namespaces, one per table.
//! - [`store`] -- the [`BoardStore`](store::BoardStore) facade consumed by the
//!   API layer, and its Postgres implementation.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::{AdminGuard, BoardStore, MemberWrite, PgBoardStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
