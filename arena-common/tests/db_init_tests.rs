//! Tests for database initialization

use arena_common::db::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_created_when_missing() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("nested").join("arena.db");

    let pool = init_database(&db_path).await;
    assert!(pool.is_ok(), "Database initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_reopen_existing_database_keeps_rows() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("arena.db");

    let pool = init_database(&db_path).await.unwrap();
    sqlx::query(
        "INSERT INTO tally_counters (board, model, metric, value) VALUES ('b', 'Gpt', 'w', 4)",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    let pool = init_database(&db_path).await.unwrap();
    let value: i64 = sqlx::query_scalar(
        "SELECT value FROM tally_counters WHERE board = 'b' AND model = 'Gpt' AND metric = 'w'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(value, 4);
}

#[tokio::test]
async fn test_schema_tables_exist() {
    let temp = TempDir::new().unwrap();
    let pool = init_database(&temp.path().join("arena.db")).await.unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(tables.contains(&"vote_records".to_string()));
    assert!(tables.contains(&"tally_counters".to_string()));
}
