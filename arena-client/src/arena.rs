//! Client-side vote reconciliation
//!
//! Combines the local ledger with the remote service. Votes are written to
//! the ledger first and then sent to the server; a failed submission keeps
//! the local vote and surfaces an error message instead of rolling back.
//! The leaderboard shown is the last remote snapshot when one was fetched,
//! otherwise the tallies folded from the local ledger.

use crate::error::{ClientError, ClientResult};
use crate::identity;
use crate::ledger::{LocalLedger, LocalVote};
use crate::remote::ArenaClient;
use crate::storage::LocalStorage;
use arena_common::api::VoteRequest;
use arena_common::leaderboard::rank;
use arena_common::{LeaderboardRow, Matchup, ModelId, Subject, TallyBoard, VoterId, Winner};
use tracing::{info, warn};

/// Last leaderboard fetched from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSnapshot {
    pub models: TallyBoard,
    pub updated_at: i64,
}

/// What happened to a vote after it was recorded locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    /// No endpoint configured; the vote exists only locally
    LocalOnly,
    Accepted,
    /// The server already had this vote
    Duplicate,
    /// Submission failed; carries the message shown to the user
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardSource {
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    pub source: LeaderboardSource,
    pub rows: Vec<LeaderboardRow>,
}

pub struct Arena {
    storage: LocalStorage,
    voter: VoterId,
    ledger: LocalLedger,
    remote: Option<ArenaClient>,
    snapshot: Option<RemoteSnapshot>,
    known_models: Vec<ModelId>,
    last_error: Option<String>,
}

impl Arena {
    /// Load local state and fetch the remote snapshot.
    ///
    /// The entry point for anything that shows a leaderboard. A failed fetch
    /// is not an error: the arena starts on local tallies.
    pub async fn mount(
        storage: LocalStorage,
        remote: Option<ArenaClient>,
        known_models: Vec<ModelId>,
    ) -> ClientResult<Self> {
        let mut arena = Self::open(storage, remote, known_models)?;
        arena.refresh().await;
        Ok(arena)
    }

    /// Load identity and ledger from `storage` only.
    ///
    /// No snapshot is fetched: [`Arena::leaderboard`] shows local tallies until
    /// [`Arena::refresh`] or an accepted [`Arena::vote`]. Use [`Arena::mount`]
    /// to start with the remote view.
    pub fn open(
        storage: LocalStorage,
        remote: Option<ArenaClient>,
        known_models: Vec<ModelId>,
    ) -> ClientResult<Self> {
        let voter = identity::load_or_create(&storage)?;
        let ledger = LocalLedger::load(&storage)?;
        Ok(Self {
            storage,
            voter,
            ledger,
            remote,
            snapshot: None,
            known_models,
            last_error: None,
        })
    }

    pub fn voter(&self) -> &VoterId {
        &self.voter
    }

    pub fn ledger(&self) -> &LocalLedger {
        &self.ledger
    }

    pub fn snapshot(&self) -> Option<&RemoteSnapshot> {
        self.snapshot.as_ref()
    }

    /// Message of the most recent failed submission, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn has_voted(&self, subject: &Subject, model_a: &ModelId, model_b: &ModelId) -> bool {
        Matchup::new(model_a, model_b)
            .map(|m| self.ledger.contains(subject, &m))
            .unwrap_or(false)
    }

    /// Fetch the remote leaderboard. Returns whether a snapshot is available;
    /// on failure the snapshot is dropped so the local tallies are shown.
    pub async fn refresh(&mut self) -> bool {
        let Some(remote) = &self.remote else {
            return false;
        };

        match remote.fetch_leaderboard().await {
            Ok(response) => {
                self.snapshot = Some(RemoteSnapshot {
                    models: response.models,
                    updated_at: response.updated_at,
                });
                true
            }
            Err(e) => {
                warn!("Leaderboard unavailable from {}: {}", remote.base_url(), e);
                self.snapshot = None;
                false
            }
        }
    }

    /// Cast a vote.
    ///
    /// Fails without side effects when both models are the same or this
    /// client already voted on the matchup for `subject`. Otherwise the vote
    /// is persisted locally before anything is sent, and remote problems are
    /// reported through [`RemoteStatus::Failed`] and [`Arena::last_error`].
    pub async fn vote(
        &mut self,
        subject: Subject,
        model_a: ModelId,
        model_b: ModelId,
        winner: Winner,
    ) -> ClientResult<RemoteStatus> {
        let matchup = Matchup::new(&model_a, &model_b)?;
        if self.ledger.contains(&subject, &matchup) {
            return Err(ClientError::AlreadyVoted {
                subject,
                matchup: matchup.key(),
            });
        }

        let vote = LocalVote {
            subject: subject.clone(),
            model_a,
            model_b,
            winner,
            voted_at: arena_common::time::now_millis(),
        };
        let request = VoteRequest {
            hw: Some(subject.as_str().to_string()),
            model_a: vote.model_a.as_str().to_string(),
            model_b: vote.model_b.as_str().to_string(),
            winner,
            client_id: self.voter.as_str().to_string(),
        };

        self.ledger.insert(vote);
        if let Err(e) = self.ledger.save(&self.storage) {
            self.ledger.remove(&subject, &matchup);
            return Err(e.into());
        }
        info!("Recorded vote on {} for {}", matchup.key(), subject);

        let Some(remote) = &self.remote else {
            return Ok(RemoteStatus::LocalOnly);
        };

        match remote.submit_vote(&request).await {
            Ok(response) if response.duplicate => Ok(RemoteStatus::Duplicate),
            Ok(_) => {
                self.last_error = None;
                self.refresh().await;
                Ok(RemoteStatus::Accepted)
            }
            Err(e) => {
                let message = format!("Vote saved locally but not sent: {}", e);
                warn!("{}", message);
                self.last_error = Some(message.clone());
                Ok(RemoteStatus::Failed(message))
            }
        }
    }

    /// Tallies from this client's own votes
    pub fn local_board(&self) -> TallyBoard {
        self.ledger.board()
    }

    /// Ranked rows: remote snapshot if available, else local tallies
    pub fn leaderboard(&self) -> Leaderboard {
        match &self.snapshot {
            Some(snapshot) => Leaderboard {
                source: LeaderboardSource::Remote,
                rows: rank(&snapshot.models, &self.known_models),
            },
            None => Leaderboard {
                source: LeaderboardSource::Local,
                rows: rank(&self.local_board(), &self.known_models),
            },
        }
    }
}
