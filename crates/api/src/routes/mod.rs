//! API route definitions.

use axum::{Router, routing::post};

use crate::AppState;

pub mod health;
pub mod rpc;

/// Creates the versioned API router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/rpc/{method}", post(rpc::call))
}
