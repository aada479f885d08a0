//! Catalog view over the song collection
//!
//! Filtering, sorting and label listing for the song list. Operates on the
//! store's listing order and never reorders songs that compare equal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{format_average_score, to_presentation, Song, SongView};

/// Songs created within this many days are flagged as new
pub const NEW_SONG_DAYS: i64 = 7;

/// Secondary orderings offered by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Most played first
    SingCount,
    /// Highest average rating first
    AverageScore,
    /// Most recently sung first; never-sung songs last
    LastSung,
}

/// Query string accepted by `GET /api/songs`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub category: Option<String>,
    pub sort: Option<SortKey>,
}

impl CatalogQuery {
    fn matches(&self, song: &Song) -> bool {
        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            let hit = song.name.to_lowercase().contains(&needle)
                || song.author.to_lowercase().contains(&needle)
                || song
                    .performers
                    .iter()
                    .any(|p| p.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(tag) = non_blank(&self.tag) {
            if !song.tags.iter().any(|t| t == tag) {
                return false;
            }
        }

        if let Some(category) = non_blank(&self.category) {
            if !song.categories.iter().any(|c| c == category) {
                return false;
            }
        }

        true
    }

    /// Filter, then stable-sort by the requested key
    pub fn apply(&self, songs: Vec<Song>) -> Vec<Song> {
        let mut selected: Vec<Song> = songs.into_iter().filter(|s| self.matches(s)).collect();

        match self.sort {
            Some(SortKey::SingCount) => selected.sort_by(|a, b| b.sing_count.cmp(&a.sing_count)),
            Some(SortKey::AverageScore) => {
                selected.sort_by(|a, b| b.average_score().total_cmp(&a.average_score()))
            }
            Some(SortKey::LastSung) => {
                selected.sort_by(|a, b| compare_last_sung(a.last_sung_at, b.last_sung_at))
            }
            None => {}
        }

        selected
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Descending by time; songs without a time after all songs with one
fn compare_last_sung(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct labels across the collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogLabels {
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

pub fn labels(songs: &[Song]) -> CatalogLabels {
    let tags: BTreeSet<&String> = songs.iter().flat_map(|s| s.tags.iter()).collect();
    let categories: BTreeSet<&String> = songs.iter().flat_map(|s| s.categories.iter()).collect();

    CatalogLabels {
        tags: tags.into_iter().cloned().collect(),
        categories: categories.into_iter().cloned().collect(),
    }
}

/// List entry: the presentation record plus derived display fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongListItem {
    #[serde(flatten)]
    pub song: SongView,
    #[serde(rename = "averageScore")]
    pub average_score: String,
    #[serde(rename = "isNew")]
    pub is_new: bool,
}

impl SongListItem {
    pub fn from_song(song: Song, now: &DateTime<Utc>) -> Self {
        let average_score = format_average_score(&song.scores);
        let is_new = songmark_common::time::is_within_days(&song.created_at, now, NEW_SONG_DAYS);
        Self {
            song: to_presentation(song),
            average_score,
            is_new,
        }
    }
}
