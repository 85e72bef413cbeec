//! GET /leaderboard
//!
//! Always the overall leaderboard: a `hw` query parameter is accepted and
//! ignored.

use crate::db::tallies;
use crate::{ApiResult, AppState};
use arena_common::api::LeaderboardResponse;
use axum::{extract::State, routing::get, Json, Router};

/// GET /leaderboard handler
pub async fn get_leaderboard(State(state): State<AppState>) -> ApiResult<Json<LeaderboardResponse>> {
    let models = tallies::read_board(&state.db).await?;

    Ok(Json(LeaderboardResponse {
        ok: true,
        models,
        updated_at: arena_common::time::now_millis(),
    }))
}

/// Build leaderboard routes
pub fn leaderboard_routes() -> Router<AppState> {
    Router::new().route(
        "/leaderboard",
        get(get_leaderboard).fallback(super::method_not_allowed),
    )
}
