//! # Homework Arena Client
//!
//! Voting client for the arena service. Keeps a persistent voter identity
//! and a local ledger of cast votes, submits them to the server, and shows
//! either the server's leaderboard or locally folded tallies when the server
//! cannot be reached.

pub mod arena;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod remote;
pub mod storage;

pub use arena::{Arena, Leaderboard, LeaderboardSource, RemoteSnapshot, RemoteStatus};
pub use error::{ClientError, ClientResult};
pub use ledger::{LocalLedger, LocalVote};
pub use remote::ArenaClient;
pub use storage::LocalStorage;
