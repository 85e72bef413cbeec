//! POST /vote

use crate::services::{self, SubmitOutcome, VoteSubmission};
use crate::{ApiResult, AppState};
use arena_common::api::VoteResponse;
use axum::{body::Bytes, extract::State, routing::post, Json, Router};

/// POST /vote handler
///
/// **Request:** `{"hw": 3, "modelA": "Gpt", "modelB": "Claude", "winner": "A", "clientId": "c_1"}`
/// **Response:** `{"ok": true}` or `{"ok": true, "duplicate": true}`
///
/// **Errors:**
/// - 400: invalid JSON or an invalid field (first failing field reported)
/// - 503: storage unavailable; the vote may need to be retried
///
/// The body is taken as raw bytes, whatever the content type, so malformed
/// JSON is reported like any other validation failure.
pub async fn submit_vote(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<VoteResponse>> {
    let vote = VoteSubmission::from_body(&body)?;

    let outcome = services::submit_vote(
        &state.db,
        &state.policy,
        &vote,
        arena_common::time::now_millis(),
    )
    .await?;

    Ok(Json(match outcome {
        SubmitOutcome::Accepted => VoteResponse::accepted(),
        SubmitOutcome::Duplicate => VoteResponse::duplicate(),
    }))
}

/// Build vote routes
pub fn vote_routes() -> Router<AppState> {
    Router::new().route(
        "/vote",
        post(submit_vote).fallback(super::method_not_allowed),
    )
}
