//! HTTP API handlers for arena-server

pub mod cors;
pub mod health;
pub mod leaderboard;
pub mod vote;

pub use cors::cors;
pub use health::health_routes;
pub use leaderboard::leaderboard_routes;
pub use vote::vote_routes;

use crate::ApiError;

/// Fallback for methods an endpoint does not support
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
