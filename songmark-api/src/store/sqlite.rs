//! SQLite-backed song store
//!
//! List columns hold JSON text, timestamps hold RFC 3339 text. Rating is a
//! single `UPDATE ... RETURNING` statement, so concurrent ratings never lose
//! an appended score.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use songmark_common::time::{parse_storage_string, to_storage_string};
use songmark_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

use super::{ensure_matching_id, SongStore};
use crate::models::{Rating, Song};

/// Song store over the `songs` table
#[derive(Clone)]
pub struct SqliteSongStore {
    pool: SqlitePool,
}

impl SqliteSongStore {
    /// Wrap a pool whose schema is already initialized
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn encode_list<T: serde::Serialize>(values: &[T]) -> Result<String> {
    Ok(serde_json::to_string(values)?)
}

fn decode_list<T: serde::de::DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<Vec<T>> {
    let raw: String = row.try_get(column)?;
    Ok(serde_json::from_str(&raw)?)
}

fn row_to_song(row: &SqliteRow) -> Result<Song> {
    let sing_count: i64 = row.try_get("sing_count")?;
    let sing_count = u32::try_from(sing_count)
        .map_err(|_| Error::Internal(format!("Invalid stored sing_count {}", sing_count)))?;

    let last_sung_at = row
        .try_get::<Option<String>, _>("last_sung_at")?
        .map(|value| parse_storage_string(&value))
        .transpose()?;

    let last_update: String = row.try_get("last_update")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Song {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        author: row.try_get("author")?,
        performers: decode_list(row, "performers")?,
        image: row.try_get("image")?,
        lyric: row.try_get("lyric")?,
        ref_urls: decode_list(row, "ref_urls")?,
        categories: decode_list(row, "categories")?,
        tags: decode_list(row, "tags")?,
        scores: decode_list(row, "scores")?,
        last_sung_at,
        sing_count,
        priority: row.try_get("priority")?,
        last_update: parse_storage_string(&last_update)?,
        created_at: parse_storage_string(&created_at)?,
    })
}

#[async_trait]
impl SongStore for SqliteSongStore {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    async fn create(&self, song: Song) -> Result<Song> {
        let row = sqlx::query(
            r#"
            INSERT INTO songs (
                id, name, author, performers, image, lyric, ref_urls,
                categories, tags, scores, last_sung_at, sing_count,
                priority, last_update, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&song.id)
        .bind(&song.name)
        .bind(&song.author)
        .bind(encode_list(&song.performers)?)
        .bind(&song.image)
        .bind(&song.lyric)
        .bind(encode_list(&song.ref_urls)?)
        .bind(encode_list(&song.categories)?)
        .bind(encode_list(&song.tags)?)
        .bind(encode_list(&song.scores)?)
        .bind(song.last_sung_at.as_ref().map(to_storage_string))
        .bind(song.sing_count as i64)
        .bind(song.priority)
        .bind(to_storage_string(&song.last_update))
        .bind(to_storage_string(&song.created_at))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let created = row_to_song(&row)?;
                info!(id = %created.id, name = %created.name, "Song created");
                Ok(created)
            }
            None => Err(Error::InvalidInput(format!(
                "Song {} already exists",
                song.id
            ))),
        }
    }

    async fn list(&self) -> Result<Vec<Song>> {
        let rows = sqlx::query("SELECT * FROM songs ORDER BY priority DESC, last_update DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_song).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<Song>> {
        let row = sqlx::query("SELECT * FROM songs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_song).transpose()
    }

    async fn update(&self, id: &str, song: &Song) -> Result<Option<Song>> {
        ensure_matching_id(id, song)?;

        let row = sqlx::query(
            r#"
            UPDATE songs SET
                name = ?,
                author = ?,
                performers = ?,
                image = ?,
                lyric = ?,
                ref_urls = ?,
                categories = ?,
                tags = ?,
                priority = ?,
                last_update = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&song.name)
        .bind(&song.author)
        .bind(encode_list(&song.performers)?)
        .bind(&song.image)
        .bind(&song.lyric)
        .bind(encode_list(&song.ref_urls)?)
        .bind(encode_list(&song.categories)?)
        .bind(encode_list(&song.tags)?)
        .bind(song.priority)
        .bind(to_storage_string(&song.last_update))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let updated = row.as_ref().map(row_to_song).transpose()?;
        if updated.is_some() {
            info!(id = %id, "Song updated");
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<Option<Song>> {
        let row = sqlx::query("DELETE FROM songs WHERE id = ? RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let deleted = row.as_ref().map(row_to_song).transpose()?;
        if deleted.is_some() {
            info!(id = %id, "Song deleted");
        }
        Ok(deleted)
    }

    async fn rate(&self, id: &str, rating: Rating, at: DateTime<Utc>) -> Result<Option<Song>> {
        let stamp = to_storage_string(&at);

        let row = sqlx::query(
            r#"
            UPDATE songs SET
                scores = json_insert(scores, '$[#]', ?),
                sing_count = sing_count + 1,
                last_sung_at = ?,
                last_update = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(rating.value() as i64)
        .bind(&stamp)
        .bind(&stamp)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let rated = row.as_ref().map(row_to_song).transpose()?;
        if let Some(song) = &rated {
            info!(id = %id, rating = rating.value(), sing_count = song.sing_count, "Song rated");
        }
        Ok(rated)
    }
}
