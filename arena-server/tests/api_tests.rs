//! Integration tests for arena-server HTTP endpoints
//!
//! Tests cover:
//! - POST /vote validation, acceptance and duplicate handling
//! - GET /leaderboard snapshots
//! - CORS preflight and headers
//! - 405 handling for unsupported methods
//! - Storage failure responses

use arena_common::db::init_database;
use arena_server::{build_router, AppState, VotePolicy};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

/// Test helper: fresh database in a temp dir (kept alive by the returned TempDir)
async fn setup() -> (TempDir, SqlitePool, Router) {
    let temp = TempDir::new().unwrap();
    let db = init_database(&temp.path().join("arena.db")).await.unwrap();
    let app = build_router(AppState::new(db.clone(), VotePolicy::default()));
    (temp, db, app)
}

fn post_vote(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/vote")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, body)
}

async fn vote(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, post_vote(body.to_string())).await
}

async fn leaderboard(app: &Router) -> Value {
    let (status, body) = send(app, get("/leaderboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    body["models"].clone()
}

// =============================================================================
// Voting scenarios
// =============================================================================

#[tokio::test]
async fn test_vote_then_leaderboard_then_duplicate() {
    let (_temp, _db, app) = setup().await;
    let body = json!({"modelA": "Gpt", "modelB": "Claude", "winner": "A", "clientId": "c_1"});

    let (status, resp) = vote(&app, body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!({"ok": true}));

    let models = leaderboard(&app).await;
    assert_eq!(models["Gpt"], json!({"w": 1, "l": 0, "t": 0}));
    assert_eq!(models["Claude"], json!({"w": 0, "l": 1, "t": 0}));

    let (status, resp) = vote(&app, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!({"ok": true, "duplicate": true}));

    assert_eq!(leaderboard(&app).await, models);
}

#[tokio::test]
async fn test_tie_vote() {
    let (_temp, _db, app) = setup().await;
    let (status, _) = vote(
        &app,
        json!({"modelA": "A", "modelB": "B", "winner": "T", "clientId": "c_2"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let models = leaderboard(&app).await;
    assert_eq!(models["A"], json!({"w": 0, "l": 0, "t": 1}));
    assert_eq!(models["B"], json!({"w": 0, "l": 0, "t": 1}));
}

#[tokio::test]
async fn test_swapped_order_is_same_matchup() {
    let (_temp, _db, app) = setup().await;
    vote(
        &app,
        json!({"hw": 1, "modelA": "Gpt", "modelB": "Claude", "winner": "A", "clientId": "c_1"}),
    )
    .await;

    // Same voter, same subject, models swapped: duplicate even with another outcome
    let (_, resp) = vote(
        &app,
        json!({"hw": 1, "modelA": "Claude", "modelB": "Gpt", "winner": "A", "clientId": "c_1"}),
    )
    .await;
    assert_eq!(resp["duplicate"], true);

    let models = leaderboard(&app).await;
    assert_eq!(models["Gpt"]["w"], 1);
    assert_eq!(models["Claude"]["w"], 0);
}

#[tokio::test]
async fn test_subjects_dedupe_independently() {
    let (_temp, _db, app) = setup().await;
    for hw in [json!(1), json!("1b"), Value::Null] {
        let (_, resp) = vote(
            &app,
            json!({"hw": hw, "modelA": "Gpt", "modelB": "Claude", "winner": "B", "clientId": "c_9"}),
        )
        .await;
        assert_eq!(resp, json!({"ok": true}), "hw={hw}");
    }

    // Missing hw shares the "unknown" scope with null
    let (_, resp) = vote(
        &app,
        json!({"modelA": "Gpt", "modelB": "Claude", "winner": "B", "clientId": "c_9"}),
    )
    .await;
    assert_eq!(resp["duplicate"], true);

    // Overall leaderboard sums across subjects
    let models = leaderboard(&app).await;
    assert_eq!(models["Claude"]["w"], 3);
    assert_eq!(models["Gpt"]["l"], 3);
}

#[tokio::test]
async fn test_body_accepted_without_json_content_type() {
    let (_temp, _db, app) = setup().await;
    let request = Request::builder()
        .method("POST")
        .uri("/vote")
        .header("content-type", "text/plain")
        .body(Body::from(
            json!({"modelA": "x", "modelB": "y", "winner": "A", "clientId": "c_1"}).to_string(),
        ))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Validation
// =============================================================================

async fn assert_rejected(app: &Router, body: impl Into<Body>, message: &str) {
    let (status, resp) = send(app, post_vote(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, json!({"ok": false, "error": message}));
}

#[tokio::test]
async fn test_validation_messages() {
    let (_temp, _db, app) = setup().await;
    let ok = json!({"modelA": "Gpt", "modelB": "Claude", "winner": "A", "clientId": "c_1"});
    let with = |field: &str, value: Value| {
        let mut body = ok.clone();
        body[field] = value;
        body.to_string()
    };

    assert_rejected(&app, "{broken", "Invalid JSON body").await;
    assert_rejected(&app, with("modelA", json!("")), "Invalid modelA").await;
    assert_rejected(&app, with("modelB", json!("  ")), "Invalid modelB").await;
    assert_rejected(&app, with("modelB", json!("Gpt")), "modelA and modelB must differ").await;
    assert_rejected(&app, with("winner", json!("X")), "Invalid winner").await;
    assert_rejected(&app, with("clientId", json!("abc")), "Invalid clientId").await;
}

#[tokio::test]
async fn test_rejected_votes_have_no_effect() {
    let (_temp, _db, app) = setup().await;
    vote(
        &app,
        json!({"modelA": "Gpt", "modelB": "Gpt", "winner": "A", "clientId": "c_1"}),
    )
    .await;
    vote(
        &app,
        json!({"modelA": "Gpt", "modelB": "Claude", "winner": "X", "clientId": "c_1"}),
    )
    .await;

    assert_eq!(leaderboard(&app).await, json!({}));

    // The rejected attempts left no record behind
    let (_, resp) = vote(
        &app,
        json!({"modelA": "Gpt", "modelB": "Claude", "winner": "A", "clientId": "c_1"}),
    )
    .await;
    assert_eq!(resp, json!({"ok": true}));
}

// =============================================================================
// Leaderboard
// =============================================================================

#[tokio::test]
async fn test_empty_leaderboard() {
    let (_temp, _db, app) = setup().await;
    let (status, body) = send(&app, get("/leaderboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["models"], json!({}));
    assert!(body["updatedAt"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_leaderboard_ignores_subject_filter() {
    let (_temp, _db, app) = setup().await;
    vote(
        &app,
        json!({"hw": 2, "modelA": "Gpt", "modelB": "Claude", "winner": "A", "clientId": "c_1"}),
    )
    .await;

    let (_, body) = send(&app, get("/leaderboard?hw=7")).await;
    assert_eq!(body["models"]["Gpt"]["w"], 1);
}

// =============================================================================
// Methods and CORS
// =============================================================================

#[tokio::test]
async fn test_wrong_methods_are_405() {
    let (_temp, _db, app) = setup().await;

    let (status, body) = send(&app, get("/vote")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"ok": false, "error": "Method not allowed"}));

    for method in ["POST", "PUT", "DELETE"] {
        let request = Request::builder()
            .method(method)
            .uri("/leaderboard")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} /leaderboard");
        assert_eq!(body["ok"], false);
    }
}

#[tokio::test]
async fn test_preflight_is_204_with_cors_headers() {
    let (_temp, _db, app) = setup().await;

    for uri in ["/vote", "/leaderboard"] {
        let request = Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .header("origin", "https://example.org")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET,POST,OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "content-type");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }
}

#[tokio::test]
async fn test_cors_headers_on_errors_too() {
    let (_temp, _db, app) = setup().await;
    let response = app.clone().oneshot(post_vote("nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_temp, _db, app) = setup().await;
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "arena-server");
    assert!(body["version"].is_string());
}

// =============================================================================
// Storage failures
// =============================================================================

#[tokio::test]
async fn test_storage_unavailable_is_503() {
    let (_temp, db, app) = setup().await;
    db.close().await;

    let (status, body) = vote(
        &app,
        json!({"modelA": "Gpt", "modelB": "Claude", "winner": "A", "clientId": "c_1"}),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"ok": false, "error": "Storage unavailable"}));

    let (status, body) = send(&app, get("/leaderboard")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_validation_runs_before_storage() {
    let (_temp, db, app) = setup().await;
    db.close().await;

    // Still a 400, not a 503: validation has no storage dependency
    assert_rejected(
        &app,
        json!({"modelA": "Gpt", "modelB": "Claude", "winner": "Z", "clientId": "c_1"}).to_string(),
        "Invalid winner",
    )
    .await;
}
