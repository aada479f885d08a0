//! One-time seed import
//!
//! Loads a JSON array of song records in either naming convention (mixed
//! arrays allowed) and inserts them through the active store. Records whose
//! identifier already exists are skipped.

use serde_json::Value;
use songmark_common::{Error, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::models::{to_presentation_batch, to_storage};
use crate::store::SongStore;

/// Counts reported after a seed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Insert already-parsed records
///
/// The whole batch is reconciled and validated before anything is written.
pub async fn seed_records(store: &dyn SongStore, records: Vec<Value>) -> Result<SeedReport> {
    let songs = to_presentation_batch(records)?
        .into_iter()
        .enumerate()
        .map(|(index, view)| {
            to_storage(view)
                .validated()
                .map_err(|e| Error::InvalidInput(format!("Record {}: {}", index, e)))
        })
        .collect::<Result<Vec<_>>>()?;
    let mut report = SeedReport::default();

    for song in songs {
        let id = song.id.clone();
        match store.create(song).await {
            Ok(_) => report.inserted += 1,
            Err(Error::InvalidInput(reason)) => {
                warn!(id = %id, reason = %reason, "Skipping seed record");
                report.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "Seed import finished"
    );
    Ok(report)
}

/// Read a JSON array from `path` and seed it
pub async fn seed_from_file(store: &dyn SongStore, path: &Path) -> Result<SeedReport> {
    info!("Seeding songs from {}", path.display());

    let contents = tokio::fs::read_to_string(path).await?;
    let value: Value = serde_json::from_str(&contents)?;
    let Value::Array(records) = value else {
        return Err(Error::InvalidInput(format!(
            "Seed file {} must contain a JSON array",
            path.display()
        )));
    };

    seed_records(store, records).await
}
