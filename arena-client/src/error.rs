//! Client error types

use arena_common::{MatchupKey, SameIdentifierError, Subject};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure (unreachable endpoint, timeout, undecodable body)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with `ok: false`
    #[error("Server rejected request ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Already voted on {matchup} for {subject}")]
    AlreadyVoted {
        subject: Subject,
        matchup: MatchupKey,
    },

    #[error(transparent)]
    SameModels(#[from] SameIdentifierError),

    /// Local storage or configuration failure
    #[error(transparent)]
    Common(#[from] arena_common::Error),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
