//! Storage layer for the vote service
//!
//! Two independently written tables: deduplication records and tally
//! counters. No statement spans both; every write is a single atomic
//! SQLite statement so concurrent requests need no in-process locking.

pub mod tallies;
pub mod vote_records;

pub use tallies::LEADERBOARD_BOARD;
pub use vote_records::{VoteRecord, VoteRecordKey};
