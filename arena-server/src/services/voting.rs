//! Vote submission
//!
//! Order of operations for a validated vote:
//! 1. Look the (subject, canonical pair, voter) key up in the record store;
//!    a live record means duplicate, answered as success.
//! 2. Write the record (conditional write; losing a race also means duplicate).
//! 3. Apply the tally increments in submission order.
//!
//! The record is written before the tally so a crash in between under-counts
//! rather than double-counts: a retry finds the record and skips step 3.
//! That gap has no compensation; [`apply_recorded_vote`] is the single place a
//! future replay job would hook into.

use crate::db::vote_records::{self, VoteRecord, VoteRecordKey};
use crate::services::tally;
use crate::services::validation::VoteSubmission;
use arena_common::Result;
use sqlx::{Pool, Sqlite};
use std::time::Duration;
use tracing::{debug, error, info};

/// Tunables for vote acceptance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePolicy {
    /// How long a vote record blocks a re-vote on the same key
    pub retention: Duration,
}

impl Default for VotePolicy {
    fn default() -> Self {
        Self {
            retention: arena_common::time::days(365),
        }
    }
}

/// Result of a submission that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// First time this key was seen; counters were updated
    Accepted,
    /// A live record already existed; nothing changed
    Duplicate,
}

/// Accept a validated vote at time `now_ms`
pub async fn submit_vote(
    db: &Pool<Sqlite>,
    policy: &VotePolicy,
    vote: &VoteSubmission,
    now_ms: i64,
) -> Result<SubmitOutcome> {
    let key = VoteRecordKey {
        subject: vote.subject.clone(),
        pair_key: vote.matchup.key(),
        voter: vote.voter.clone(),
    };

    if vote_records::exists(db, &key, now_ms).await? {
        debug!(
            "Duplicate vote: subject={} pair={} voter={}",
            key.subject, key.pair_key, key.voter
        );
        return Ok(SubmitOutcome::Duplicate);
    }

    let record = VoteRecord {
        outcome: vote.matchup.canonical_outcome(&vote.model_a, vote.winner),
        key,
    };

    if !vote_records::put(db, &record, now_ms, policy.retention).await? {
        debug!(
            "Concurrent duplicate vote: subject={} pair={} voter={}",
            record.key.subject, record.key.pair_key, record.key.voter
        );
        return Ok(SubmitOutcome::Duplicate);
    }

    apply_recorded_vote(db, vote).await?;

    info!(
        "Vote accepted: subject={} {} vs {} winner={}",
        vote.subject, vote.model_a, vote.model_b, vote.winner
    );
    Ok(SubmitOutcome::Accepted)
}

/// Apply the counters for a vote whose record is already durable
pub async fn apply_recorded_vote(db: &Pool<Sqlite>, vote: &VoteSubmission) -> Result<()> {
    tally::apply_vote(db, &vote.model_a, &vote.model_b, vote.winner)
        .await
        .map_err(|e| {
            error!(
                "Vote recorded but tally update failed (subject={} pair={} voter={}): {}",
                vote.subject,
                vote.matchup.key(),
                vote.voter,
                e
            );
            e
        })
}
