//! Database initialization
//!
//! Opens (or creates) the SQLite file and makes sure the `songs` table exists.
//! List-valued columns are stored as JSON text; timestamps as RFC 3339 text.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_songs_table(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the schema applied
///
/// Limited to one connection: every SQLite `:memory:` connection is a separate database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    create_songs_table(&pool).await?;

    Ok(pool)
}

/// Create the songs table
///
/// Column names follow the storage convention (`ref_urls`, `last_sung_at`, `sing_count`).
pub async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            author TEXT NOT NULL DEFAULT '',
            performers TEXT NOT NULL DEFAULT '[]',
            image TEXT NOT NULL DEFAULT '',
            lyric TEXT NOT NULL DEFAULT '',
            ref_urls TEXT NOT NULL DEFAULT '[]',
            categories TEXT NOT NULL DEFAULT '[]',
            tags TEXT NOT NULL DEFAULT '[]',
            scores TEXT NOT NULL DEFAULT '[]',
            last_sung_at TEXT,
            sing_count INTEGER NOT NULL DEFAULT 0,
            priority INTEGER NOT NULL DEFAULT 0,
            last_update TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_songs_priority ON songs (priority DESC, last_update DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
