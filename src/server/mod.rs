//! HTTP surface: a router over the listings query.

pub mod routes;

use crate::pipeline::ListingsService;
use axum::{extract::Extension, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use routes::{health_handler, listings_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ListingsService>,
    /// Radius applied when a query does not name one
    pub default_radius: u32,
}

/// Build the Axum application router
pub fn build_app(state: AppState, query_timeout: Duration) -> Router {
    Router::new()
        .route("/listings", get(listings_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(TimeoutLayer::new(query_timeout))
        .layer(TraceLayer::new_for_http())
}
