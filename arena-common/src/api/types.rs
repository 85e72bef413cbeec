//! Request/response bodies of the arena HTTP API
//!
//! Field names follow the JSON contract (`modelA`, `clientId`, `updatedAt`).
//! Every response carries an `ok` flag; failures add a human-readable `error`.

use crate::model::Winner;
use crate::tally::TallyBoard;
use serde::{Deserialize, Serialize};

/// Body of `POST /vote` as sent by clients
///
/// The server does not deserialize into this type directly: it validates the
/// raw JSON field by field so each failure gets its own message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hw: Option<String>,
    pub model_a: String,
    pub model_b: String,
    pub winner: Winner,
    pub client_id: String,
}

/// Successful `POST /vote` response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    pub ok: bool,
    /// Present (and `true`) only when the vote had already been recorded
    #[serde(default, skip_serializing_if = "is_false")]
    pub duplicate: bool,
}

impl VoteResponse {
    pub fn accepted() -> Self {
        Self {
            ok: true,
            duplicate: false,
        }
    }

    pub fn duplicate() -> Self {
        Self {
            ok: true,
            duplicate: true,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// `GET /leaderboard` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub ok: bool,
    pub models: TallyBoard,
    /// Response time, Unix epoch milliseconds
    pub updated_at: i64,
}

/// Body of every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}
