//! Background housekeeping

use crate::db::vote_records;
use sqlx::{Pool, Sqlite};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Periodically delete expired vote records.
///
/// Expired records are already ignored by lookups and replaced by new votes;
/// this only keeps the table from growing without bound.
pub fn spawn_purge_task(db: Pool<Sqlite>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match vote_records::purge_expired(&db, arena_common::time::now_millis()).await {
                Ok(0) => debug!("Purge: no expired vote records"),
                Ok(n) => info!("Purged {} expired vote records", n),
                Err(e) => warn!("Purge of expired vote records failed: {}", e),
            }
        }
    })
}
