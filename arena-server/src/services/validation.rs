//! Vote body validation
//!
//! The body is checked field by field, in a fixed order, and the first
//! failure wins. Each failure has its own message, which is sent back to the
//! client verbatim.

use arena_common::{Matchup, ModelId, Subject, VoterId, Winner};
use serde_json::Value;
use thiserror::Error;

/// Why a vote body was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VoteValidationError {
    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("Invalid modelA")]
    InvalidModelA,

    #[error("Invalid modelB")]
    InvalidModelB,

    #[error("modelA and modelB must differ")]
    SameModels,

    #[error("Invalid winner")]
    InvalidWinner,

    #[error("Invalid clientId")]
    InvalidClientId,
}

/// A vote that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSubmission {
    pub subject: Subject,
    /// Models in the voter's own A/B order
    pub model_a: ModelId,
    pub model_b: ModelId,
    pub winner: Winner,
    pub voter: VoterId,
    pub matchup: Matchup,
}

impl VoteSubmission {
    /// Validate a raw request body
    pub fn from_body(body: &[u8]) -> Result<Self, VoteValidationError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|_| VoteValidationError::InvalidJson)?;
        Self::from_json(&value)
    }

    /// Validate an already-parsed body. Non-object bodies fail on `modelA`.
    pub fn from_json(body: &Value) -> Result<Self, VoteValidationError> {
        let model_a = model_field(body, "modelA").ok_or(VoteValidationError::InvalidModelA)?;
        let model_b = model_field(body, "modelB").ok_or(VoteValidationError::InvalidModelB)?;

        let matchup =
            Matchup::new(&model_a, &model_b).map_err(|_| VoteValidationError::SameModels)?;

        let winner = body
            .get("winner")
            .and_then(Value::as_str)
            .and_then(Winner::parse)
            .ok_or(VoteValidationError::InvalidWinner)?;

        let voter = body
            .get("clientId")
            .and_then(Value::as_str)
            .and_then(|s| VoterId::new(s).ok())
            .ok_or(VoteValidationError::InvalidClientId)?;

        Ok(Self {
            subject: Subject::from_json(body.get("hw")),
            model_a,
            model_b,
            winner,
            voter,
            matchup,
        })
    }
}

fn model_field(body: &Value, field: &str) -> Option<ModelId> {
    body.get(field)
        .and_then(Value::as_str)
        .and_then(|s| ModelId::new(s).ok())
}
