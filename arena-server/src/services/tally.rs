//! Tally aggregator
//!
//! Applies one accepted vote to the two affected models' counters. The two
//! increments are independent atomic adds issued concurrently; there is no
//! rollback if one of them fails after the other succeeded.

use crate::db::tallies;
use arena_common::tally::increments;
use arena_common::{ModelId, Result, Winner};
use sqlx::{Pool, Sqlite};

/// Apply `winner` (relative to the submitted A/B order) to both models.
///
/// Subjects are not part of the tally: the leaderboard is always overall.
pub async fn apply_vote(
    db: &Pool<Sqlite>,
    model_a: &ModelId,
    model_b: &ModelId,
    winner: Winner,
) -> Result<()> {
    let [(first_model, first_metric), (second_model, second_metric)] =
        increments(model_a, model_b, winner);

    tokio::try_join!(
        tallies::increment(db, &first_model, first_metric, 1),
        tallies::increment(db, &second_model, second_metric, 1),
    )?;

    Ok(())
}
