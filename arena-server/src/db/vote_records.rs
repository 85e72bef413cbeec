//! Vote record store
//!
//! Holds one record per (subject, canonical pair, voter) with an expiry.
//! A record past its expiry is treated as absent: `exists` ignores it and
//! `put` may replace it.

use arena_common::{CanonicalOutcome, MatchupKey, Result, Subject, VoterId};
use sqlx::{Pool, Sqlite};
use std::time::Duration;

/// Identity of a vote record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecordKey {
    pub subject: Subject,
    pub pair_key: MatchupKey,
    pub voter: VoterId,
}

/// A vote record; the outcome is relative to the canonical pair order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub key: VoteRecordKey,
    pub outcome: CanonicalOutcome,
}

/// Whether a live (unexpired) record exists for `key` at `now_ms`
pub async fn exists(db: &Pool<Sqlite>, key: &VoteRecordKey, now_ms: i64) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT 1 FROM vote_records
        WHERE subject = ? AND pair_key = ? AND voter_id = ? AND expires_at > ?
        "#,
    )
    .bind(key.subject.as_str())
    .bind(key.pair_key.as_str())
    .bind(key.voter.as_str())
    .bind(now_ms)
    .fetch_optional(db)
    .await?;

    Ok(found.is_some())
}

/// Outcome of the live record for `key`, if any
pub async fn get(
    db: &Pool<Sqlite>,
    key: &VoteRecordKey,
    now_ms: i64,
) -> Result<Option<CanonicalOutcome>> {
    let outcome: Option<String> = sqlx::query_scalar(
        r#"
        SELECT outcome FROM vote_records
        WHERE subject = ? AND pair_key = ? AND voter_id = ? AND expires_at > ?
        "#,
    )
    .bind(key.subject.as_str())
    .bind(key.pair_key.as_str())
    .bind(key.voter.as_str())
    .bind(now_ms)
    .fetch_optional(db)
    .await?;

    Ok(outcome.as_deref().and_then(CanonicalOutcome::parse))
}

/// Write `record` unless a live record already holds its key.
///
/// Returns `true` when this call created (or replaced an expired) record and
/// `false` when a live record was already there. The check and the write are
/// one statement, so of several concurrent callers for the same key exactly
/// one sees `true`.
pub async fn put(
    db: &Pool<Sqlite>,
    record: &VoteRecord,
    now_ms: i64,
    retention: Duration,
) -> Result<bool> {
    let expires_at = now_ms.saturating_add(arena_common::time::duration_to_millis(retention));

    let result = sqlx::query(
        r#"
        INSERT INTO vote_records (subject, pair_key, voter_id, outcome, created_at, expires_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(subject, pair_key, voter_id) DO UPDATE SET
            outcome = excluded.outcome,
            created_at = excluded.created_at,
            expires_at = excluded.expires_at
        WHERE vote_records.expires_at <= excluded.created_at
        "#,
    )
    .bind(record.key.subject.as_str())
    .bind(record.key.pair_key.as_str())
    .bind(record.key.voter.as_str())
    .bind(record.outcome.as_str())
    .bind(now_ms)
    .bind(expires_at)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete every record expired at `now_ms`; returns how many were removed
pub async fn purge_expired(db: &Pool<Sqlite>, now_ms: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM vote_records WHERE expires_at <= ?")
        .bind(now_ms)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}
