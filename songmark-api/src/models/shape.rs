//! Storage/presentation shape reconciliation
//!
//! The same song record travels under two field-naming conventions:
//!
//! | storage (database) | presentation (HTTP API) |
//! |--------------------|-------------------------|
//! | `ref_urls`         | `refUrls`               |
//! | `last_sung_at`     | `lastSungAt`            |
//! | `sing_count`       | `singCount`             |
//!
//! Every other field has the same name in both. Conversion is renaming only,
//! so `to_presentation(to_storage(v)) == v` and `to_storage(to_presentation(s)) == s`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use songmark_common::{Error, Result};

use super::song::Song;

/// Song record in the presentation convention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongView {
    pub id: String,
    pub name: String,
    pub author: String,
    pub performers: Vec<String>,
    pub image: String,
    pub lyric: String,
    #[serde(rename = "refUrls")]
    pub ref_urls: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub scores: Vec<u8>,
    #[serde(rename = "lastSungAt")]
    pub last_sung_at: Option<DateTime<Utc>>,
    #[serde(rename = "singCount")]
    pub sing_count: u32,
    pub priority: i64,
    pub last_update: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// JSON type expected for a field
#[derive(Debug, Clone, Copy)]
enum FieldKind {
    String,
    Array,
    Number,
    NullableString,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Array => value.is_array(),
            FieldKind::Number => value.is_number(),
            FieldKind::NullableString => value.is_null() || value.is_string(),
        }
    }
}

const SHARED_FIELDS: &[(&str, FieldKind)] = &[
    ("id", FieldKind::String),
    ("name", FieldKind::String),
    ("author", FieldKind::String),
    ("performers", FieldKind::Array),
    ("image", FieldKind::String),
    ("lyric", FieldKind::String),
    ("categories", FieldKind::Array),
    ("tags", FieldKind::Array),
    ("scores", FieldKind::Array),
    ("priority", FieldKind::Number),
    ("last_update", FieldKind::String),
    ("created_at", FieldKind::String),
];

const STORAGE_FIELDS: &[(&str, FieldKind)] = &[
    ("ref_urls", FieldKind::Array),
    ("last_sung_at", FieldKind::NullableString),
    ("sing_count", FieldKind::Number),
];

const PRESENTATION_FIELDS: &[(&str, FieldKind)] = &[
    ("refUrls", FieldKind::Array),
    ("lastSungAt", FieldKind::NullableString),
    ("singCount", FieldKind::Number),
];

fn has_fields(value: &Value, fields: &[(&str, FieldKind)]) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    fields
        .iter()
        .all(|(name, kind)| object.get(*name).is_some_and(|v| kind.accepts(v)))
}

/// True when every storage-convention field is present with the expected JSON type
pub fn is_storage_shape(value: &Value) -> bool {
    has_fields(value, SHARED_FIELDS) && has_fields(value, STORAGE_FIELDS)
}

/// True when every presentation-convention field is present with the expected JSON type
pub fn is_presentation_shape(value: &Value) -> bool {
    has_fields(value, SHARED_FIELDS) && has_fields(value, PRESENTATION_FIELDS)
}

/// A song record tagged with the convention it arrived in
#[derive(Debug, Clone, PartialEq)]
pub enum SongShape {
    Storage(Song),
    Presentation(SongView),
}

impl SongShape {
    /// Validate and decode a storage-convention record
    pub fn storage(value: Value) -> Result<Self> {
        if !is_storage_shape(&value) {
            return Err(Error::InvalidInput(
                "Record does not match the storage convention".to_string(),
            ));
        }
        let song = serde_json::from_value(value)
            .map_err(|e| Error::InvalidInput(format!("Malformed storage record: {}", e)))?;
        Ok(SongShape::Storage(song))
    }

    /// Validate and decode a presentation-convention record
    pub fn presentation(value: Value) -> Result<Self> {
        if !is_presentation_shape(&value) {
            return Err(Error::InvalidInput(
                "Record does not match the presentation convention".to_string(),
            ));
        }
        let view = serde_json::from_value(value)
            .map_err(|e| Error::InvalidInput(format!("Malformed presentation record: {}", e)))?;
        Ok(SongShape::Presentation(view))
    }

    /// Decode a record of either convention, storage checked first
    pub fn detect(value: Value) -> Result<Self> {
        if is_storage_shape(&value) {
            Self::storage(value)
        } else if is_presentation_shape(&value) {
            Self::presentation(value)
        } else {
            Err(Error::InvalidInput(
                "Record matches neither the storage nor the presentation convention".to_string(),
            ))
        }
    }

    pub fn into_presentation(self) -> SongView {
        match self {
            SongShape::Storage(song) => to_presentation(song),
            SongShape::Presentation(view) => view,
        }
    }

    pub fn into_storage(self) -> Song {
        match self {
            SongShape::Storage(song) => song,
            SongShape::Presentation(view) => to_storage(view),
        }
    }
}

/// Storage → presentation (renaming only)
pub fn to_presentation(song: Song) -> SongView {
    SongView {
        id: song.id,
        name: song.name,
        author: song.author,
        performers: song.performers,
        image: song.image,
        lyric: song.lyric,
        ref_urls: song.ref_urls,
        categories: song.categories,
        tags: song.tags,
        scores: song.scores,
        last_sung_at: song.last_sung_at,
        sing_count: song.sing_count,
        priority: song.priority,
        last_update: song.last_update,
        created_at: song.created_at,
    }
}

/// Presentation → storage (renaming only)
pub fn to_storage(view: SongView) -> Song {
    Song {
        id: view.id,
        name: view.name,
        author: view.author,
        performers: view.performers,
        image: view.image,
        lyric: view.lyric,
        ref_urls: view.ref_urls,
        categories: view.categories,
        tags: view.tags,
        scores: view.scores,
        last_sung_at: view.last_sung_at,
        sing_count: view.sing_count,
        priority: view.priority,
        last_update: view.last_update,
        created_at: view.created_at,
    }
}

/// Convert a possibly mixed collection to the presentation convention
///
/// Storage-shaped elements are renamed, presentation-shaped elements pass
/// through unchanged. An element of neither shape fails the whole batch.
pub fn to_presentation_batch(values: Vec<Value>) -> Result<Vec<SongView>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            SongShape::detect(value)
                .map(SongShape::into_presentation)
                .map_err(|e| Error::InvalidInput(format!("Record {}: {}", index, e)))
        })
        .collect()
}
