//! Vote service logic between the HTTP handlers and the storage layer

pub mod maintenance;
pub mod tally;
pub mod validation;
pub mod voting;

pub use validation::{VoteSubmission, VoteValidationError};
pub use voting::{submit_vote, SubmitOutcome, VotePolicy};
