//! Local vote ledger
//!
//! Every vote this client has cast, keyed by subject and canonical matchup.
//! Entries are write-once: a client votes at most once per matchup per
//! subject. The ledger is persisted as a JSON list under [`VOTES_KEY`] and
//! loads as empty when the stored value is missing or unreadable.

use crate::storage::{LocalStorage, VOTES_KEY};
use arena_common::{Matchup, MatchupKey, ModelId, Result, Subject, TallyBoard, Winner};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// One vote as the user cast it (submission order, not canonical order)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalVote {
    pub subject: Subject,
    pub model_a: ModelId,
    pub model_b: ModelId,
    pub winner: Winner,
    /// Unix epoch milliseconds
    pub voted_at: i64,
}

impl LocalVote {
    /// Ledger key, or `None` for an entry naming the same model twice
    fn key(&self) -> Option<(Subject, MatchupKey)> {
        Matchup::new(&self.model_a, &self.model_b)
            .ok()
            .map(|m| (self.subject.clone(), m.key()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocalLedger {
    entries: BTreeMap<(Subject, MatchupKey), LocalVote>,
}

impl LocalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from storage. Unreadable data yields an empty ledger.
    pub fn load(storage: &LocalStorage) -> Result<Self> {
        let Some(raw) = storage.get(VOTES_KEY)? else {
            return Ok(Self::new());
        };

        let votes: Vec<LocalVote> = match serde_json::from_str(&raw) {
            Ok(votes) => votes,
            Err(e) => {
                warn!("Ignoring unreadable vote ledger: {}", e);
                return Ok(Self::new());
            }
        };

        let mut ledger = Self::new();
        for vote in votes {
            if valid_model(&vote.model_a) && valid_model(&vote.model_b) {
                ledger.insert(vote);
            }
        }
        Ok(ledger)
    }

    pub fn save(&self, storage: &LocalStorage) -> Result<()> {
        let votes: Vec<&LocalVote> = self.entries.values().collect();
        storage.set(VOTES_KEY, &serde_json::to_string(&votes)?)
    }

    pub fn contains(&self, subject: &Subject, matchup: &Matchup) -> bool {
        self.entries.contains_key(&(subject.clone(), matchup.key()))
    }

    pub fn get(&self, subject: &Subject, matchup: &Matchup) -> Option<&LocalVote> {
        self.entries.get(&(subject.clone(), matchup.key()))
    }

    /// Record a vote; returns `false` (and changes nothing) if this subject
    /// and matchup already have an entry
    pub fn insert(&mut self, vote: LocalVote) -> bool {
        let Some(key) = vote.key() else {
            return false;
        };
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, vote);
        true
    }

    pub fn remove(&mut self, subject: &Subject, matchup: &Matchup) -> Option<LocalVote> {
        self.entries.remove(&(subject.clone(), matchup.key()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalVote> {
        self.entries.values()
    }

    /// Tallies across every subject, using the same rule as the server
    pub fn board(&self) -> TallyBoard {
        TallyBoard::from_votes(
            self.entries
                .values()
                .map(|v| (&v.model_a, &v.model_b, v.winner)),
        )
    }
}

// Deserialization is not validating, so re-check stored identifiers
fn valid_model(model: &ModelId) -> bool {
    ModelId::new(model.as_str()).is_ok()
}
