//! Import pipeline: video URL → draft song
//!
//! URL → identifier → oEmbed metadata → title split + lyrics extraction →
//! [`SongInput`] draft. The draft is never persisted here; the client
//! reviews it and submits it through the regular create endpoint.

use serde::{Deserialize, Serialize};

use super::lyrics_extractor::extract_lyrics;
use super::oembed_client::{FetchError, FetchOutcome, OEmbedClient, VideoMetadata};
use super::title_splitter::split_title;
use crate::models::SongInput;

/// Where the draft's metadata came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    Fetched,
    Fallback,
}

/// Pre-filled song awaiting user review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDraft {
    pub song: SongInput,
    pub source: MetadataSource,
}

/// Run the full pipeline for one URL
pub async fn import_from_url(client: &OEmbedClient, url: &str) -> Result<ImportDraft, FetchError> {
    let outcome = client.fetch_metadata(url).await?;
    Ok(build_draft(url, outcome))
}

/// Assemble a draft from a fetch outcome
pub fn build_draft(url: &str, outcome: FetchOutcome) -> ImportDraft {
    let source = if outcome.is_fallback() {
        MetadataSource::Fallback
    } else {
        MetadataSource::Fetched
    };
    let VideoMetadata {
        title,
        author,
        thumbnail,
        description,
        ..
    } = outcome.into_metadata();

    // The split only feeds the author; the name stays the title as fetched
    let split = split_title(&title);
    let author = if split.artist.is_empty() {
        author
    } else {
        split.artist
    };
    let performers = if author.is_empty() {
        Vec::new()
    } else {
        vec![author.clone()]
    };

    let lyrics = extract_lyrics(&description);
    let lyric = if lyrics.is_empty() { description } else { lyrics };

    ImportDraft {
        song: SongInput {
            name: title,
            author,
            performers,
            image: thumbnail,
            lyric,
            ref_urls: vec![url.to_string()],
            ..Default::default()
        },
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(title: &str, author: &str, description: &str) -> VideoMetadata {
        VideoMetadata {
            video_id: "abc123".to_string(),
            title: title.to_string(),
            author: author.to_string(),
            thumbnail: "https://img.example/abc123.jpg".to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_draft_uses_split_artist() {
        let outcome = FetchOutcome::Fetched(metadata(
            "Sầu Tím Thiệp Hồng - Lệ Quyên (Official MV)",
            "Channel Name",
            "",
        ));
        let draft = build_draft("https://youtu.be/abc123", outcome);

        assert_eq!(draft.source, MetadataSource::Fetched);
        assert_eq!(draft.song.name, "Sầu Tím Thiệp Hồng - Lệ Quyên (Official MV)");
        assert_eq!(draft.song.author, "Lệ Quyên");
        assert_eq!(draft.song.performers, vec!["Lệ Quyên"]);
        assert_eq!(draft.song.image, "https://img.example/abc123.jpg");
        assert_eq!(draft.song.ref_urls, vec!["https://youtu.be/abc123"]);
        assert!(draft.song.id.is_none());
    }

    #[test]
    fn test_draft_falls_back_to_channel_author() {
        let outcome = FetchOutcome::Fetched(metadata("Đêm Đông", "Bằng Kiều Official", ""));
        let draft = build_draft("https://youtu.be/abc123", outcome);

        assert_eq!(draft.song.name, "Đêm Đông");
        assert_eq!(draft.song.author, "Bằng Kiều Official");
        assert_eq!(draft.song.performers, vec!["Bằng Kiều Official"]);
    }

    #[test]
    fn test_draft_lyric_prefers_extracted_block() {
        let description = "Lyrics:\nsầu tím thiệp hồng, tôi gửi cho ai\n\nSubscribe!";
        let outcome = FetchOutcome::Fetched(metadata("Song - Singer", "", description));
        let draft = build_draft("https://youtu.be/abc123", outcome);
        assert_eq!(draft.song.lyric, "sầu tím thiệp hồng, tôi gửi cho ai");
    }

    #[test]
    fn test_draft_lyric_keeps_description_when_nothing_found() {
        let outcome = FetchOutcome::Fetched(metadata("Song - Singer", "", "Thanks for watching"));
        let draft = build_draft("https://youtu.be/abc123", outcome);
        assert_eq!(draft.song.lyric, "Thanks for watching");
    }

    #[test]
    fn test_fallback_draft() {
        let outcome = FetchOutcome::Fallback(VideoMetadata::fallback("abc123"));
        let draft = build_draft("https://youtu.be/abc123", outcome);

        assert_eq!(draft.source, MetadataSource::Fallback);
        assert_eq!(draft.song.name, "YouTube Video (abc123)");
        assert!(draft.song.author.is_empty());
        assert!(draft.song.performers.is_empty());
        assert!(draft.song.lyric.is_empty());
    }

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(MetadataSource::Fallback).unwrap(),
            serde_json::json!("fallback")
        );
    }
}
