//! Voter identity lifecycle
//!
//! Created once per client, persisted, and reused for every vote after that.

use crate::storage::{LocalStorage, CLIENT_ID_KEY};
use arena_common::{Result, VoterId};
use tracing::{info, warn};

/// Load the persisted identity, creating and storing a new one if absent or invalid
pub fn load_or_create(storage: &LocalStorage) -> Result<VoterId> {
    if let Some(stored) = storage.get(CLIENT_ID_KEY)? {
        match VoterId::new(stored.trim()) {
            Ok(voter) => return Ok(voter),
            Err(e) => warn!("Discarding stored client identity: {}", e),
        }
    }

    let voter = VoterId::generate();
    storage.set(CLIENT_ID_KEY, voter.as_str())?;
    info!("Created client identity {}", voter);
    Ok(voter)
}
