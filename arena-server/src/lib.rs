//! arena-server library - pairwise model vote service
//!
//! Accepts deduplicated votes between two models and serves the aggregated
//! win/loss/tie leaderboard over JSON HTTP.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};
pub use crate::services::VotePolicy;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Vote acceptance rules
    pub policy: VotePolicy,
}

impl AppState {
    pub fn new(db: SqlitePool, policy: VotePolicy) -> Self {
        Self { db, policy }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use tower_http::trace::TraceLayer;

    Router::new()
        .merge(api::vote_routes())
        .merge(api::leaderboard_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(middleware::from_fn(api::cors))
        .layer(TraceLayer::new_for_http())
}
