//! Boardhub API server library.
//!
//! Exposes the board service, configuration, state, error handling, routes
//! and WebSocket infrastructure so integration tests and the binary
//! entrypoint can both reach them.

pub mod auth;
pub mod boards;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
