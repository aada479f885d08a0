//! Database initialization tests against a file-backed database

use songmark_common::db::init_database;

#[tokio::test]
async fn test_init_database_creates_file_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("data").join("songmark.db");

    let pool = init_database(&db_path).await.unwrap();
    assert!(db_path.exists());

    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('songs')")
        .fetch_all(&pool)
        .await
        .unwrap();

    for expected in ["id", "ref_urls", "last_sung_at", "sing_count", "last_update", "created_at"] {
        assert!(
            columns.iter().any(|c| c == expected),
            "missing column {}",
            expected
        );
    }
}

#[tokio::test]
async fn test_init_database_reopens_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("songmark.db");

    let pool = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO songs (id, name, last_update, created_at) VALUES ('a', 'A', 'x', 'x')")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    let pool = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
