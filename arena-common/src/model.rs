//! Domain identifiers and vote outcomes
//!
//! Identifiers are opaque strings compared by exact, case-sensitive value.
//! Validation happens once at construction so the rest of the code can pass
//! the newtypes around without re-checking.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use uuid::Uuid;

/// Separator joining the two halves of a matchup key.
///
/// Model identifiers may not contain it, nor start or end with `:`, so a key
/// always splits back into exactly the two identifiers that produced it.
pub const PAIR_SEPARATOR: &str = "::";

/// Prefix every client-generated voter identity must carry
pub const VOTER_ID_PREFIX: &str = "c_";

/// Subject used when a vote is cast without a scope
pub const UNSCOPED_SUBJECT: &str = "unknown";

/// Name of a participant (an LLM) in the arena
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Validate and wrap a model identifier.
    ///
    /// Rejects empty and whitespace-only strings, strings containing
    /// [`PAIR_SEPARATOR`] and strings with a leading or trailing `:`.
    /// The identifier is kept exactly as given (no trimming).
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(Error::InvalidInput("model identifier is empty".to_string()));
        }
        if value.contains(PAIR_SEPARATOR) || value.starts_with(':') || value.ends_with(':') {
            return Err(Error::InvalidInput(format!(
                "model identifier {:?} contains reserved sequence {:?}",
                value, PAIR_SEPARATOR
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-generated pseudo-identity of a voter (no authentication behind it)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    /// Validate an existing voter identity (must start with [`VOTER_ID_PREFIX`])
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if !value.starts_with(VOTER_ID_PREFIX) {
            return Err(Error::InvalidInput(format!(
                "voter identity must start with {:?}",
                VOTER_ID_PREFIX
            )));
        }
        Ok(Self(value))
    }

    /// Create a fresh random identity
    pub fn generate() -> Self {
        Self(format!("{}{}", VOTER_ID_PREFIX, Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scope under which a matchup is voted on (e.g. a homework number)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(String);

impl Subject {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The sentinel subject for votes cast without a scope
    pub fn unscoped() -> Self {
        Self(UNSCOPED_SUBJECT.to_string())
    }

    /// Derive the subject from the optional `hw` field of a vote body.
    ///
    /// Absent or `null` maps to the unscoped sentinel, strings are used as-is,
    /// numbers use their shortest decimal text (`3.0` and `3` are both `"3"`),
    /// every other JSON value is scoped under its JSON text.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::unscoped(),
            Some(Value::String(s)) => Self(s.clone()),
            Some(Value::Number(n)) => Self(number_text(n)),
            Some(other) => Self(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Integral floats below 1e21 print without a fraction; larger or
/// fractional values keep their JSON text
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{:.0}", f)
            }
        }
        _ => n.to_string(),
    }
}

impl Default for Subject {
    fn default() -> Self {
        Self::unscoped()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome as submitted, relative to the voter's own A/B order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
    /// Tie
    #[serde(rename = "T")]
    T,
}

impl Winner {
    /// Parse the wire literal (`"A"`, `"B"` or `"T"`)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "A" => Some(Winner::A),
            "B" => Some(Winner::B),
            "T" => Some(Winner::T),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Winner::A => "A",
            Winner::B => "B",
            Winner::T => "T",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome relative to the canonical (sorted) order of a matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalOutcome {
    FirstWins,
    SecondWins,
    Tie,
}

impl CanonicalOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalOutcome::FirstWins => "first_wins",
            CanonicalOutcome::SecondWins => "second_wins",
            CanonicalOutcome::Tie => "tie",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "first_wins" => Some(CanonicalOutcome::FirstWins),
            "second_wins" => Some(CanonicalOutcome::SecondWins),
            "tie" => Some(CanonicalOutcome::Tie),
            _ => None,
        }
    }
}
