//! Tally counters
//!
//! Every (model, metric) pair is its own row under one shared board key, so
//! the whole leaderboard comes back from a single query while each counter is
//! bumped by an independent atomic upsert.

use arena_common::{Metric, ModelId, Result, TallyBoard};
use sqlx::{Pool, Sqlite};
use tracing::warn;

/// Board key all leaderboard counters live under
pub const LEADERBOARD_BOARD: &str = "hw_arena:leaderboard";

/// Atomically add `delta` to one counter, creating it on first use
pub async fn increment(db: &Pool<Sqlite>, model: &ModelId, metric: Metric, delta: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tally_counters (board, model, metric, value)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(board, model, metric) DO UPDATE SET value = value + excluded.value
        "#,
    )
    .bind(LEADERBOARD_BOARD)
    .bind(model.as_str())
    .bind(metric.as_str())
    .bind(delta)
    .execute(db)
    .await?;

    Ok(())
}

/// Read every counter on the board
///
/// Rows with an unknown metric or an unusable model name are skipped; negative
/// values read as zero.
pub async fn read_board(db: &Pool<Sqlite>) -> Result<TallyBoard> {
    let rows: Vec<(String, String, i64)> = sqlx::query_as(
        "SELECT model, metric, value FROM tally_counters WHERE board = ?",
    )
    .bind(LEADERBOARD_BOARD)
    .fetch_all(db)
    .await?;

    let mut board = TallyBoard::new();
    for (model, metric, value) in rows {
        let Some(metric) = Metric::parse(&metric) else {
            continue;
        };
        let model = match ModelId::new(model) {
            Ok(model) => model,
            Err(e) => {
                warn!("Skipping tally row: {}", e);
                continue;
            }
        };
        board.set_counter(model, metric, u64::try_from(value).unwrap_or(0));
    }

    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_common::db::init_database;
    use arena_common::Tally;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, Pool<Sqlite>) {
        let temp = TempDir::new().unwrap();
        let pool = init_database(&temp.path().join("arena.db")).await.unwrap();
        (temp, pool)
    }

    fn m(s: &str) -> ModelId {
        ModelId::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_empty_board() {
        let (_temp, db) = setup().await;
        assert!(read_board(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_increments_accumulate() {
        let (_temp, db) = setup().await;
        increment(&db, &m("Gpt"), Metric::Wins, 1).await.unwrap();
        increment(&db, &m("Gpt"), Metric::Wins, 1).await.unwrap();
        increment(&db, &m("Gpt"), Metric::Ties, 1).await.unwrap();
        increment(&db, &m("Claude"), Metric::Losses, 1).await.unwrap();

        let board = read_board(&db).await.unwrap();
        assert_eq!(board.get(&m("Gpt")), Some(&Tally::new(2, 0, 1)));
        assert_eq!(board.get(&m("Claude")), Some(&Tally::new(0, 1, 0)));
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let (_temp, db) = setup().await;
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..20 {
            let db = db.clone();
            tasks.spawn(async move { increment(&db, &m("Gpt"), Metric::Wins, 1).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.expect("task panicked").unwrap();
        }

        let board = read_board(&db).await.unwrap();
        assert_eq!(board.get(&m("Gpt")).map(|t| t.w), Some(20));
    }

    #[tokio::test]
    async fn test_unknown_metric_rows_ignored() {
        let (_temp, db) = setup().await;
        sqlx::query("INSERT INTO tally_counters (board, model, metric, value) VALUES (?, 'Gpt', 'x', 7)")
            .bind(LEADERBOARD_BOARD)
            .execute(&db)
            .await
            .unwrap();
        sqlx::query("INSERT INTO tally_counters (board, model, metric, value) VALUES ('other', 'Gpt', 'w', 7)")
            .execute(&db)
            .await
            .unwrap();

        assert!(read_board(&db).await.unwrap().is_empty());
    }
}
