//! Service modules for the song import pipeline
//!
//! Leaves first: URL parsing, metadata lookup, title and lyrics heuristics,
//! then the pipeline that assembles a draft song from them.

pub mod import;
pub mod lyrics_extractor;
pub mod oembed_client;
pub mod title_splitter;
pub mod video_url;

pub use import::{build_draft, import_from_url, ImportDraft, MetadataSource};
pub use lyrics_extractor::extract_lyrics;
pub use oembed_client::{FetchError, FetchOutcome, OEmbedClient, VideoMetadata};
pub use title_splitter::{split_title, SongTitle};
pub use video_url::{extract_video_id, is_valid_video_url};
