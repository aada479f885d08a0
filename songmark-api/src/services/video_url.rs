//! Video identifier extraction
//!
//! Pure string matching over the usual YouTube URL shapes. No network access.

use once_cell::sync::Lazy;
use regex::Regex;

/// URL shapes tried in order; the first capture wins
static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Watch, short link and embed forms
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)").unwrap(),
        // Legacy /v/ form
        Regex::new(r"youtube\.com/v/([^&\n?#]+)").unwrap(),
        // Watch URL with `v` after other query parameters
        Regex::new(r"youtube\.com/watch\?(?:[^#\n]*&)?v=([^&\n?#]+)").unwrap(),
    ]
});

/// Extract the video identifier, or `None` when no known shape matches
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// True iff [`extract_video_id`] succeeds
pub fn is_valid_video_url(url: &str) -> bool {
    extract_video_id(url).is_some()
}

/// Canonical watch URL for an identifier
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Conventional thumbnail URL for an identifier
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}
