//! # Homework Arena Common Library
//!
//! Shared code for the arena vote service and its clients:
//! - Domain identifiers (models, voters, subjects) and vote outcomes
//! - Matchup canonicalization
//! - Tally accounting and leaderboard ranking
//! - Wire types for the HTTP API
//! - Configuration loading and root folder resolution
//! - Database initialization

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod leaderboard;
pub mod matchup;
pub mod model;
pub mod tally;
pub mod time;

pub use error::{Error, Result};
pub use leaderboard::LeaderboardRow;
pub use matchup::{Matchup, MatchupKey, SameIdentifierError};
pub use model::{CanonicalOutcome, ModelId, Subject, VoterId, Winner};
pub use tally::{Metric, Tally, TallyBoard};
