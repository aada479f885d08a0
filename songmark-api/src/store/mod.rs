//! Song persistence
//!
//! [`SongStore`] is the single seam between handlers and storage. A store is
//! chosen at start-up (`storage = "sqlite" | "memory"`) and shared through
//! `AppState` as `Arc<dyn SongStore>`.

pub mod memory;
pub mod sqlite;

pub use memory::{builtin_songs, MemorySongStore};
pub use sqlite::SqliteSongStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use songmark_common::Result;

use crate::models::{Rating, Song};

/// Keyed song storage
///
/// Lookups that miss return `Ok(None)`; the caller decides whether that is a 404.
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Short name for logs and health output
    fn kind(&self) -> &'static str;

    /// Insert a new record. An identifier already in use is invalid input.
    async fn create(&self, song: Song) -> Result<Song>;

    /// All songs, priority descending then last update descending
    async fn list(&self) -> Result<Vec<Song>>;

    async fn get(&self, id: &str) -> Result<Option<Song>>;

    /// Replace the editable fields and `last_update` of the record at `id`
    ///
    /// Identity, creation time and usage statistics are left as stored.
    async fn update(&self, id: &str, song: &Song) -> Result<Option<Song>>;

    /// Remove a record, returning it
    async fn delete(&self, id: &str) -> Result<Option<Song>>;

    /// Append `rating`, bump the play count and stamp `at` as one atomic step
    async fn rate(&self, id: &str, rating: Rating, at: DateTime<Utc>) -> Result<Option<Song>>;
}

/// Order used by [`SongStore::list`]
pub(crate) fn sort_for_listing(songs: &mut [Song]) {
    songs.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.last_update.cmp(&a.last_update))
    });
}

fn ensure_matching_id(id: &str, song: &Song) -> Result<()> {
    if song.id != id {
        return Err(songmark_common::Error::InvalidInput(format!(
            "Song identifier mismatch: {} vs {}",
            id, song.id
        )));
    }
    Ok(())
}
