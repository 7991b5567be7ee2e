//! RPC surface of the ledger.
//!
//! This crate provides:
//! - The operation set ([`rpc::LedgerApi`]) and its request/response types
//! - The store-backed engine ([`service::LedgerService`])
//! - The authorization gate ([`gate::AuthGate`])
//! - The Axum transport: `POST /api/v1/rpc/{method}` and `GET /health`

pub mod gate;
pub mod middleware;
pub mod routes;
pub mod rpc;
pub mod service;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, header::AUTHORIZATION};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use rpc::LedgerApi;

/// Requests running longer than this are cancelled; open database
/// transactions roll back when their future is dropped.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The gated operation set.
    pub api: Arc<dyn LedgerApi>,
    /// Metadata header carrying the bearer token.
    pub token_header: String,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let sensitive: Vec<HeaderName> = std::iter::once(AUTHORIZATION)
        .chain(HeaderName::try_from(state.token_header.as_str()).ok())
        .collect();

    Router::new()
        .merge(routes::health::routes())
        .nest("/api/v1", routes::api_routes())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new(sensitive))
        .with_state(state)
}
