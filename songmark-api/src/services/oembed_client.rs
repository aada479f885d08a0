//! oEmbed metadata client
//!
//! Looks up title/author/thumbnail for a video with exactly one request and
//! no retry. A failed or malformed lookup never reaches the caller as an
//! error: it degrades to a synthesized [`FetchOutcome::Fallback`] record so
//! that importing never blocks manual song entry.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::video_url::{extract_video_id, thumbnail_url, watch_url};

const USER_AGENT: &str = concat!("SongMark/", env!("CARGO_PKG_VERSION"));
const UNKNOWN_TITLE: &str = "Unknown Title";

/// Errors surfaced by [`OEmbedClient::fetch_metadata`]
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

/// Lookup failures absorbed into the fallback record
#[derive(Debug, Error)]
enum LookupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}")]
    Api(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Normalized video metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub thumbnail: String,
    pub description: String,
}

impl VideoMetadata {
    /// Placeholder used when the lookup fails
    pub fn fallback(video_id: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            title: format!("YouTube Video ({})", video_id),
            author: String::new(),
            thumbnail: thumbnail_url(video_id),
            description: String::new(),
        }
    }
}

/// Result of a metadata fetch: real data or a synthesized placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(VideoMetadata),
    Fallback(VideoMetadata),
}

impl FetchOutcome {
    pub fn metadata(&self) -> &VideoMetadata {
        match self {
            FetchOutcome::Fetched(m) | FetchOutcome::Fallback(m) => m,
        }
    }

    pub fn into_metadata(self) -> VideoMetadata {
        match self {
            FetchOutcome::Fetched(m) | FetchOutcome::Fallback(m) => m,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::Fallback(_))
    }
}

/// oEmbed response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
    author_name: Option<String>,
    thumbnail_url: Option<String>,
    description: Option<String>,
}

/// oEmbed API client
pub struct OEmbedClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl OEmbedClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::ClientSetup(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch metadata for a full video URL
    ///
    /// Only an unrecognizable URL is an error; every lookup failure becomes
    /// [`FetchOutcome::Fallback`].
    pub async fn fetch_metadata(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let video_id =
            extract_video_id(url).ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;

        match self.lookup(&video_id).await {
            Ok(metadata) => {
                tracing::info!(
                    video_id = %video_id,
                    title = %metadata.title,
                    "Retrieved video metadata"
                );
                Ok(FetchOutcome::Fetched(metadata))
            }
            Err(e) => {
                tracing::warn!(
                    video_id = %video_id,
                    error = %e,
                    "oEmbed lookup failed, using fallback metadata"
                );
                Ok(FetchOutcome::Fallback(VideoMetadata::fallback(&video_id)))
            }
        }
    }

    async fn lookup(&self, video_id: &str) -> Result<VideoMetadata, LookupError> {
        let target = watch_url(video_id);

        tracing::debug!(video_id = %video_id, endpoint = %self.endpoint, "Querying oEmbed");

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("url", target.as_str()), ("format", "json")])
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Api(status.as_u16()));
        }

        let body: OEmbedResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        Ok(VideoMetadata {
            video_id: video_id.to_string(),
            title: non_empty(body.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            author: non_empty(body.author_name).unwrap_or_default(),
            thumbnail: non_empty(body.thumbnail_url).unwrap_or_else(|| thumbnail_url(video_id)),
            description: body.description.unwrap_or_default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
