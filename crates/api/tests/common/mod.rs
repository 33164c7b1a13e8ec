#![allow(dead_code)]

pub mod memory_store;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use boardhub_core::license::{License, LicenseProvider, StaticLicense};
use boardhub_core::types::EntityId;
use boardhub_db::{BoardStore, PgBoardStore};
use boardhub_events::{BoardEvent, EventBus};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tower::ServiceExt;

use boardhub_api::auth::jwt::{generate_access_token, JwtConfig};
use boardhub_api::boards::BoardService;
use boardhub_api::config::ServerConfig;
use boardhub_api::router::build_app_router;
use boardhub_api::state::AppState;
use boardhub_api::ws::WsManager;

use memory_store::MemoryStore;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with a compliance license installed.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        event_bus_capacity: 64,
        license: Some(compliance_license()),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

pub fn compliance_license() -> License {
    License::from_feature_list("compliance").unwrap()
}

// ---------------------------------------------------------------------------
// Service fixtures (in-memory store)
// ---------------------------------------------------------------------------

/// A board service over an in-memory store, with a bus subscriber attached
/// so tests can observe broadcasts.
pub struct ServiceFixture {
    pub service: BoardService,
    pub store: Arc<MemoryStore>,
    pub events: broadcast::Receiver<BoardEvent>,
}

impl ServiceFixture {
    pub fn new() -> Self {
        Self::with_license(StaticLicense(Some(compliance_license())))
    }

    pub fn with_license(license: impl LicenseProvider + 'static) -> Self {
        let store = Arc::new(MemoryStore::new());
        let bus = Arc::new(EventBus::default());
        let events = bus.subscribe();
        let service = BoardService::new(
            Arc::clone(&store) as Arc<dyn BoardStore>,
            Arc::new(license),
            bus,
        );
        Self {
            service,
            store,
            events,
        }
    }

    /// Every event published so far, in order.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

// ---------------------------------------------------------------------------
// HTTP fixtures (Postgres store)
// ---------------------------------------------------------------------------

/// Build the full application router over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let event_bus = Arc::new(EventBus::new(config.event_bus_capacity));
    let boards = Arc::new(BoardService::new(
        Arc::new(PgBoardStore::new(pool.clone())),
        Arc::new(StaticLicense(config.license.clone())),
        Arc::clone(&event_bus),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus,
        boards,
    };

    build_app_router(state, &config)
}

pub fn bearer(user_id: EntityId) -> String {
    let config = test_config();
    let token = generate_access_token(user_id, &config.jwt).unwrap();
    format!("Bearer {token}")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user: Option<EntityId>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user {
        builder = builder.header("authorization", bearer(user_id));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, user: EntityId) -> Response<Body> {
    send(app, Method::GET, uri, Some(user), None).await
}

pub async fn get_anonymous(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    user: EntityId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str, user: EntityId) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), None).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    user: EntityId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(user), Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    user: EntityId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(user), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, user: EntityId) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the JSON body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
