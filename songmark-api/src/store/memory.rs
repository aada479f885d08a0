//! In-memory song store
//!
//! Used for local runs without a database file. Starts from the built-in
//! example songs unless constructed empty.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use songmark_common::{Error, Result};
use tokio::sync::RwLock;
use tracing::info;

use super::{ensure_matching_id, sort_for_listing, SongStore};
use crate::models::{Rating, Song, SongShape};

/// Song store held in process memory
#[derive(Default)]
pub struct MemorySongStore {
    songs: RwLock<Vec<Song>>,
}

impl MemorySongStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_songs(songs: Vec<Song>) -> Self {
        Self {
            songs: RwLock::new(songs),
        }
    }

    /// Store pre-filled with [`builtin_songs`]
    pub fn with_builtin_songs() -> Result<Self> {
        Ok(Self::with_songs(builtin_songs()?))
    }
}

#[async_trait]
impl SongStore for MemorySongStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, song: Song) -> Result<Song> {
        let mut songs = self.songs.write().await;
        if songs.iter().any(|s| s.id == song.id) {
            return Err(Error::InvalidInput(format!("Song {} already exists", song.id)));
        }

        info!(id = %song.id, name = %song.name, "Song created");
        songs.insert(0, song.clone());
        Ok(song)
    }

    async fn list(&self) -> Result<Vec<Song>> {
        let mut songs = self.songs.read().await.clone();
        sort_for_listing(&mut songs);
        Ok(songs)
    }

    async fn get(&self, id: &str) -> Result<Option<Song>> {
        Ok(self.songs.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, id: &str, song: &Song) -> Result<Option<Song>> {
        ensure_matching_id(id, song)?;

        let mut songs = self.songs.write().await;
        let Some(stored) = songs.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        stored.name = song.name.clone();
        stored.author = song.author.clone();
        stored.performers = song.performers.clone();
        stored.image = song.image.clone();
        stored.lyric = song.lyric.clone();
        stored.ref_urls = song.ref_urls.clone();
        stored.categories = song.categories.clone();
        stored.tags = song.tags.clone();
        stored.priority = song.priority;
        stored.last_update = song.last_update;

        info!(id = %id, "Song updated");
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: &str) -> Result<Option<Song>> {
        let mut songs = self.songs.write().await;
        let removed = songs
            .iter()
            .position(|s| s.id == id)
            .map(|index| songs.remove(index));

        if removed.is_some() {
            info!(id = %id, "Song deleted");
        }
        Ok(removed)
    }

    async fn rate(&self, id: &str, rating: Rating, at: DateTime<Utc>) -> Result<Option<Song>> {
        let mut songs = self.songs.write().await;
        let Some(stored) = songs.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        stored.scores.push(rating.value());
        stored.sing_count += 1;
        stored.last_sung_at = Some(at);
        stored.last_update = at;

        info!(id = %id, rating = rating.value(), sing_count = stored.sing_count, "Song rated");
        Ok(Some(stored.clone()))
    }
}

/// The two example songs a fresh in-memory store starts with
pub fn builtin_songs() -> Result<Vec<Song>> {
    let records = [
        json!({
            "id": "1",
            "name": "Sầu Tím Thiệp Hồng",
            "author": "Hoàng Thi Thơ",
            "performers": ["Lệ Quyên", "Quang Hà"],
            "image": "https://i.scdn.co/image/ab67616d0000b273c5649add07ed3720be9d5526",
            "lyric": "Sầu tím thiệp hồng\nTôi gửi cho ai đó\nMột tấm thiệp hồng\nVới nỗi sầu tím...",
            "ref_urls": ["https://www.youtube.com/watch?v=example1"],
            "categories": ["Bolero", "Nhạc Vàng"],
            "tags": ["Tình Yêu", "Sầu", "Classic"],
            "scores": [5, 4, 5, 4, 5],
            "last_sung_at": "2024-01-01T00:00:00Z",
            "sing_count": 5,
            "priority": 95,
            "last_update": "2024-01-01T00:00:00Z",
            "created_at": "2024-01-01T00:00:00Z"
        }),
        json!({
            "id": "2",
            "name": "Tàu Anh Qua Núi",
            "author": "Phạm Duy",
            "performers": ["Thái Thanh", "Duy Khánh"],
            "image": "https://i.scdn.co/image/ab67616d0000b273c5649add07ed3720be9d5527",
            "lyric": "Tàu anh qua núi\nTàu em qua đồi...",
            "ref_urls": ["https://www.youtube.com/watch?v=example2"],
            "categories": ["Nhạc Vàng", "Dân Ca"],
            "tags": ["Núi", "Dân Ca", "Classic"],
            "scores": [4, 5, 4, 5, 4],
            "last_sung_at": "2024-01-02T00:00:00Z",
            "sing_count": 5,
            "priority": 85,
            "last_update": "2024-01-02T00:00:00Z",
            "created_at": "2024-01-01T00:00:00Z"
        }),
    ];

    records
        .into_iter()
        .map(|record| SongShape::storage(record).map(SongShape::into_storage))
        .collect()
}
