//! Win/loss/tie accounting
//!
//! A single rule decides which counters a vote touches. The server applies it
//! as two independent counter increments; clients fold it over their local
//! ledger. Both go through [`increments`] so the two views can never disagree
//! on what a vote means.

use crate::model::{ModelId, Winner};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the three per-model counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Wins,
    Losses,
    Ties,
}

impl Metric {
    /// Field name used in storage and on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Wins => "w",
            Metric::Losses => "l",
            Metric::Ties => "t",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "w" => Some(Metric::Wins),
            "l" => Some(Metric::Losses),
            "t" => Some(Metric::Ties),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two counter updates a vote produces, in submission order.
///
/// `A` wins: A gains a win, B a loss. `B` wins: the reverse. Tie: one tie each.
pub fn increments(model_a: &ModelId, model_b: &ModelId, winner: Winner) -> [(ModelId, Metric); 2] {
    match winner {
        Winner::A => [
            (model_a.clone(), Metric::Wins),
            (model_b.clone(), Metric::Losses),
        ],
        Winner::B => [
            (model_b.clone(), Metric::Wins),
            (model_a.clone(), Metric::Losses),
        ],
        Winner::T => [
            (model_a.clone(), Metric::Ties),
            (model_b.clone(), Metric::Ties),
        ],
    }
}

/// Counters for one model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    #[serde(default)]
    pub w: u64,
    #[serde(default)]
    pub l: u64,
    #[serde(default)]
    pub t: u64,
}

impl Tally {
    pub fn new(w: u64, l: u64, t: u64) -> Self {
        Self { w, l, t }
    }

    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Wins => self.w,
            Metric::Losses => self.l,
            Metric::Ties => self.t,
        }
    }

    pub fn set(&mut self, metric: Metric, value: u64) {
        match metric {
            Metric::Wins => self.w = value,
            Metric::Losses => self.l = value,
            Metric::Ties => self.t = value,
        }
    }

    pub fn bump(&mut self, metric: Metric) {
        let next = self.get(metric).saturating_add(1);
        self.set(metric, next);
    }

    /// Sum of all counters, saturating at `u64::MAX` (counters may come from
    /// an untrusted remote snapshot)
    pub fn total(&self) -> u64 {
        self.w.saturating_add(self.l).saturating_add(self.t)
    }

    /// `(wins + ties / 2) / total` clamped to `0..=1`, or 0 for a model with
    /// no votes
    pub fn score(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        ((self.w as f64 + 0.5 * self.t as f64) / total as f64).min(1.0)
    }
}

/// Counters for every model seen so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TallyBoard(BTreeMap<ModelId, Tally>);

impl TallyBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold votes (in submission order) into a fresh board
    pub fn from_votes<'a, I>(votes: I) -> Self
    where
        I: IntoIterator<Item = (&'a ModelId, &'a ModelId, Winner)>,
    {
        let mut board = Self::new();
        for (a, b, winner) in votes {
            board.apply_vote(a, b, winner);
        }
        board
    }

    pub fn apply_vote(&mut self, model_a: &ModelId, model_b: &ModelId, winner: Winner) {
        for (model, metric) in increments(model_a, model_b, winner) {
            self.0.entry(model).or_default().bump(metric);
        }
    }

    /// Overwrite a single counter (used when decoding stored counters)
    pub fn set_counter(&mut self, model: ModelId, metric: Metric, value: u64) {
        self.0.entry(model).or_default().set(metric, value);
    }

    /// Make sure a model appears, with zero counters if it has none
    pub fn seed(&mut self, model: &ModelId) {
        self.0.entry(model.clone()).or_default();
    }

    pub fn get(&self, model: &ModelId) -> Option<&Tally> {
        self.0.get(model)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModelId, &Tally)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<ModelId, Tally> {
        self.0
    }
}

impl From<BTreeMap<ModelId, Tally>> for TallyBoard {
    fn from(map: BTreeMap<ModelId, Tally>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(s: &str) -> ModelId {
        ModelId::new(s).unwrap()
    }

    #[test]
    fn test_total_saturates() {
        let tally = Tally::new(u64::MAX, 1, u64::MAX);
        assert_eq!(tally.total(), u64::MAX);
        assert!(tally.score() <= 1.0);
    }

    #[test]
    fn test_increments_follow_submission_order() {
        let (a, b) = (m("Gpt"), m("Claude"));
        assert_eq!(
            increments(&a, &b, Winner::A),
            [(a.clone(), Metric::Wins), (b.clone(), Metric::Losses)]
        );
        assert_eq!(
            increments(&a, &b, Winner::B),
            [(b.clone(), Metric::Wins), (a.clone(), Metric::Losses)]
        );
        assert_eq!(
            increments(&a, &b, Winner::T),
            [(a.clone(), Metric::Ties), (b.clone(), Metric::Ties)]
        );
    }

    #[test]
    fn test_score_formula() {
        let tally = Tally::new(3, 1, 2);
        assert_eq!(tally.total(), 6);
        assert!((tally.score() - 4.0 / 6.0).abs() < 1e-12);
        assert_eq!(Tally::default().score(), 0.0);
    }

    #[test]
    fn test_board_conservation() {
        let (a, b, c) = (m("a"), m("b"), m("c"));
        let votes = vec![
            (&a, &b, Winner::A),
            (&b, &c, Winner::B),
            (&c, &a, Winner::A),
            (&a, &c, Winner::T),
            (&b, &a, Winner::T),
        ];
        let board = TallyBoard::from_votes(votes);

        let wins: u64 = board.iter().map(|(_, t)| t.w).sum();
        let losses: u64 = board.iter().map(|(_, t)| t.l).sum();
        let ties: u64 = board.iter().map(|(_, t)| t.t).sum();
        assert_eq!(wins, 3);
        assert_eq!(losses, 3);
        assert_eq!(ties, 4);
    }

    #[test]
    fn test_board_serializes_as_wire_map() {
        let mut board = TallyBoard::new();
        board.apply_vote(&m("Gpt"), &m("Claude"), Winner::A);
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Claude": {"w": 0, "l": 1, "t": 0},
                "Gpt": {"w": 1, "l": 0, "t": 0},
            })
        );
    }

    #[test]
    fn test_seed_keeps_existing_counters() {
        let mut board = TallyBoard::new();
        board.apply_vote(&m("a"), &m("b"), Winner::A);
        board.seed(&m("a"));
        board.seed(&m("z"));
        assert_eq!(board.get(&m("a")), Some(&Tally::new(1, 0, 0)));
        assert_eq!(board.get(&m("z")), Some(&Tally::default()));
    }

    #[test]
    fn test_metric_field_names() {
        assert_eq!(Metric::parse("w"), Some(Metric::Wins));
        assert_eq!(Metric::parse("x"), None);
        assert_eq!(Metric::Ties.as_str(), "t");
    }
}
