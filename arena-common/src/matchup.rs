//! Matchup canonicalization
//!
//! A matchup is an unordered pair of two distinct models. Its key is built by
//! sorting the two identifiers (ordinal string order) and joining them with
//! [`PAIR_SEPARATOR`], so `key(a, b) == key(b, a)`.
//!
//! Outcomes travel in two orders that must not be mixed up: voters submit
//! results relative to their own A/B order, while stored vote records use the
//! canonical order of the key.

use crate::model::{CanonicalOutcome, ModelId, Winner, PAIR_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Both sides of a matchup named the same model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("matchup needs two different models, got {0:?} twice")]
pub struct SameIdentifierError(pub String);

/// Order-independent key of a matchup
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchupKey(String);

impl MatchupKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical key for two distinct models
pub fn canonical_pair_key(a: &ModelId, b: &ModelId) -> Result<MatchupKey, SameIdentifierError> {
    Matchup::new(a, b).map(|m| m.key())
}

/// Two distinct models held in canonical order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matchup {
    first: ModelId,
    second: ModelId,
}

impl Matchup {
    pub fn new(a: &ModelId, b: &ModelId) -> Result<Self, SameIdentifierError> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Ok(Self {
                first: a.clone(),
                second: b.clone(),
            }),
            std::cmp::Ordering::Greater => Ok(Self {
                first: b.clone(),
                second: a.clone(),
            }),
            std::cmp::Ordering::Equal => Err(SameIdentifierError(a.to_string())),
        }
    }

    pub fn first(&self) -> &ModelId {
        &self.first
    }

    pub fn second(&self) -> &ModelId {
        &self.second
    }

    pub fn key(&self) -> MatchupKey {
        MatchupKey(format!("{}{}{}", self.first, PAIR_SEPARATOR, self.second))
    }

    /// Translate a submission-order result into canonical order.
    ///
    /// `submitted_a` is the model the voter called "A"; it must be one of the
    /// two models of this matchup.
    pub fn canonical_outcome(&self, submitted_a: &ModelId, winner: Winner) -> CanonicalOutcome {
        let a_is_first = *submitted_a == self.first;
        match (winner, a_is_first) {
            (Winner::T, _) => CanonicalOutcome::Tie,
            (Winner::A, true) | (Winner::B, false) => CanonicalOutcome::FirstWins,
            (Winner::A, false) | (Winner::B, true) => CanonicalOutcome::SecondWins,
        }
    }
}
