//! Leaderboard projection
//!
//! Rows are derived from a [`TallyBoard`] on every read and never stored.
//! Ranking is total and deterministic: score descending, then wins
//! descending, then losses ascending, then model identifier ascending.

use crate::model::ModelId;
use crate::tally::{Tally, TallyBoard};
use serde::Serialize;
use std::cmp::Ordering;

/// One ranked leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub model: ModelId,
    pub wins: u64,
    pub losses: u64,
    pub ties: u64,
    pub total: u64,
    pub score: f64,
}

impl LeaderboardRow {
    pub fn new(model: ModelId, tally: Tally) -> Self {
        Self {
            model,
            wins: tally.w,
            losses: tally.l,
            ties: tally.t,
            total: tally.total(),
            score: tally.score(),
        }
    }
}

/// Display order of two rows
pub fn ranking_order(a: &LeaderboardRow, b: &LeaderboardRow) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| a.losses.cmp(&b.losses))
        .then_with(|| a.model.cmp(&b.model))
}

/// Project a board into ranked rows.
///
/// Every model in `known` gets a row, zero-filled when the board has nothing
/// for it.
pub fn rank(board: &TallyBoard, known: &[ModelId]) -> Vec<LeaderboardRow> {
    let mut seeded = board.clone();
    for model in known {
        seeded.seed(model);
    }

    let mut rows: Vec<LeaderboardRow> = seeded
        .into_inner()
        .into_iter()
        .map(|(model, tally)| LeaderboardRow::new(model, tally))
        .collect();
    rows.sort_by(ranking_order);
    rows
}
