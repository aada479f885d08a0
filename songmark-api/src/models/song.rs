//! Song record
//!
//! [`Song`] is the authoritative record in the storage convention
//! (`ref_urls`, `last_sung_at`, `sing_count`). The presentation convention
//! lives in [`super::shape::SongView`].
//!
//! Usage statistics (`scores`, `sing_count`, `last_sung_at`) are only changed
//! by the rating operation; edits never touch them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use songmark_common::{Error, Result};

/// Lowest accepted rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating
pub const MAX_RATING: i64 = 5;

/// Song record in the storage convention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub name: String,
    pub author: String,
    pub performers: Vec<String>,
    pub image: String,
    pub lyric: String,
    pub ref_urls: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    /// Every rating ever given, in submission order
    pub scores: Vec<u8>,
    pub last_sung_at: Option<DateTime<Utc>>,
    pub sing_count: u32,
    pub priority: i64,
    pub last_update: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A validated rating in `1..=5`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i64) -> Result<Self> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(Error::InvalidInput(format!(
                "Invalid rating {} (must be {}-{})",
                value, MIN_RATING, MAX_RATING
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Client-supplied song fields in the presentation convention
///
/// Used for creation (everything but `name` may be omitted), for edits,
/// and as the draft produced by the import pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub performers: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub lyric: String,
    #[serde(default, rename = "refUrls")]
    pub ref_urls: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: i64,
    /// Accepted on creation only (seed data); ignored by edits
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scores: Vec<i64>,
    #[serde(default, rename = "singCount", skip_serializing_if = "Option::is_none")]
    pub sing_count: Option<u32>,
    #[serde(default, rename = "lastSungAt", skip_serializing_if = "Option::is_none")]
    pub last_sung_at: Option<DateTime<Utc>>,
}

impl Song {
    /// Build a new record from client input
    ///
    /// `id` is used only when the input carries none.
    pub fn create(input: SongInput, id: String, now: DateTime<Utc>) -> Result<Self> {
        let name = validate_name(&input.name)?;
        let scores = input
            .scores
            .iter()
            .map(|s| Rating::new(*s).map(Rating::value))
            .collect::<Result<Vec<u8>>>()?;

        let id = match input.id {
            Some(given) if !given.trim().is_empty() => given.trim().to_string(),
            _ => id,
        };

        Ok(Song {
            id,
            name,
            author: input.author.trim().to_string(),
            performers: clean_list(input.performers),
            image: input.image.trim().to_string(),
            lyric: input.lyric,
            ref_urls: clean_list(input.ref_urls),
            categories: dedup_labels(input.categories),
            tags: dedup_labels(input.tags),
            sing_count: input.sing_count.unwrap_or(scores.len() as u32),
            scores,
            last_sung_at: input.last_sung_at,
            priority: input.priority,
            last_update: now,
            created_at: now,
        })
    }

    /// Apply an edit, keeping identity, creation time and usage statistics
    pub fn apply_edit(&mut self, input: SongInput, now: DateTime<Utc>) -> Result<()> {
        if let Some(given) = &input.id {
            if given != &self.id {
                return Err(Error::InvalidInput(format!(
                    "Song identifier cannot change ({} -> {})",
                    self.id, given
                )));
            }
        }

        self.name = validate_name(&input.name)?;
        self.author = input.author.trim().to_string();
        self.performers = clean_list(input.performers);
        self.image = input.image.trim().to_string();
        self.lyric = input.lyric;
        self.ref_urls = clean_list(input.ref_urls);
        self.categories = dedup_labels(input.categories);
        self.tags = dedup_labels(input.tags);
        self.priority = input.priority;
        self.last_update = now;

        Ok(())
    }

    /// Enforce the creation rules on a record that arrived whole (seed data)
    ///
    /// Trims the name and rejects it when blank, trims list entries, drops
    /// duplicate labels and rejects any score outside the rating range.
    pub fn validated(mut self) -> Result<Self> {
        self.name = validate_name(&self.name)?;
        for score in &self.scores {
            Rating::new(*score as i64)?;
        }

        self.author = self.author.trim().to_string();
        self.image = self.image.trim().to_string();
        self.performers = clean_list(self.performers);
        self.ref_urls = clean_list(self.ref_urls);
        self.categories = dedup_labels(self.categories);
        self.tags = dedup_labels(self.tags);

        Ok(self)
    }

    /// Mean of all scores, 0.0 when never rated
    pub fn average_score(&self) -> f64 {
        average_score(&self.scores)
    }
}

/// Arithmetic mean of `scores`, 0.0 for an empty list
pub fn average_score(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: u32 = scores.iter().map(|s| *s as u32).sum();
    total as f64 / scores.len() as f64
}

/// Average rendered with one decimal place (`"4.6"`, `"0.0"`)
pub fn format_average_score(scores: &[u8]) -> String {
    format!("{:.1}", average_score(scores))
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("Song name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Trim entries and drop empty ones, keeping order
fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Trim, drop empties and keep the first occurrence of each label
pub fn dedup_labels(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    clean_list(values)
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
