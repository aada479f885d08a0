//! Song name / artist splitting for video titles
//!
//! Best-effort heuristic: titles that do not follow a `Name - Artist`
//! style degrade to a song name with an empty artist.
//!
//! Pipeline:
//! 1. Strip bracketed annotations and decorative phrases until stable
//! 2. Try each separator pattern in order
//! 3. Clean the right-hand side of filler vocabulary
//! 4. Accept the first split whose cleaned artist is non-empty

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Result of splitting a title
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SongTitle {
    pub artist: String,
    #[serde(rename = "songName")]
    pub song_name: String,
}

/// Innermost bracket pairs: `[...]`, `(...)`, `【...】`, `「...」`
static BRACKETS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\[[^\[\]]*\]").unwrap(),
        Regex::new(r"\([^()]*\)").unwrap(),
        Regex::new(r"【[^【】]*】").unwrap(),
        Regex::new(r"「[^「」]*」").unwrap(),
    ]
});

/// Decorative phrases removed from the whole title
static DECORATIVE_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\bofficial\s+(?:music\s+|lyrics?\s+)?video\b").unwrap(),
        Regex::new(r"(?i)\blyrics?\s+video\b").unwrap(),
        Regex::new(r"(?i)\bmusic\s+video\b").unwrap(),
        Regex::new(r"(?i)\b(?:mv|audio|live|cover|remix|version)\b").unwrap(),
    ]
});

/// `<left> <separator> <right>` shapes, tried in order
static SEPARATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^(.+?)\s*[-–—]\s*(.+)$").unwrap(),
        Regex::new(r"^(.+?)\s*:\s*(.+)$").unwrap(),
        Regex::new(r"^(.+?)\s*\|\s*(.+)$").unwrap(),
        Regex::new(r#"^(.+?)\s*"(.+?)"$"#).unwrap(),
        Regex::new(r"^(.+?)\s*'(.+?)'$").unwrap(),
    ]
});

/// Filler vocabulary stripped from artist candidates (multi-word entries first)
static ARTIST_FILLER: Lazy<Regex> = Lazy::new(|| {
    let words = [
        // Vietnamese karaoke markers
        r"beat\s+chuẩn",
        r"giọng\s+nữ",
        r"giọng\s+nam",
        "tone",
        "nữ",
        "nam",
        "beat",
        "chuẩn",
        "karaoke",
        "kara",
        "giọng",
        // Production and credit words
        r"produced\s+by",
        "cover",
        "remix",
        "version",
        "official",
        "lyrics",
        "music",
        "video",
        "mv",
        "audio",
        "live",
        "acoustic",
        "instrumental",
        "original",
        "studio",
        "recording",
        "mix",
        "featuring",
        "feat",
        "ft",
        "prod",
    ];
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|"))).unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Remove bracketed annotations and decorative phrases, then collapse whitespace
pub fn clean_title(title: &str) -> String {
    let mut cleaned = title.to_string();
    loop {
        let before = cleaned.clone();
        for pattern in BRACKETS.iter().chain(DECORATIVE_PHRASES.iter()) {
            cleaned = pattern.replace_all(&cleaned, " ").into_owned();
        }
        if cleaned == before {
            break;
        }
    }
    collapse_whitespace(&cleaned)
}

/// Strip filler words, drop single-character tokens, title-case the rest
pub fn clean_artist_name(raw: &str) -> String {
    let stripped = ARTIST_FILLER.replace_all(raw, " ");
    collapse_whitespace(&stripped)
        .split(' ')
        .filter(|word| word.chars().count() > 1)
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

fn try_separator(pattern: &Regex, cleaned: &str) -> Option<SongTitle> {
    let caps = pattern.captures(cleaned)?;
    let song_name = caps.get(1)?.as_str().trim();
    let artist = clean_artist_name(caps.get(2)?.as_str());

    if artist.is_empty() || song_name.is_empty() {
        return None;
    }

    Some(SongTitle {
        artist,
        song_name: song_name.to_string(),
    })
}

/// Split a raw video title into song name and artist
pub fn split_title(title: &str) -> SongTitle {
    let cleaned = clean_title(title);

    SEPARATORS
        .iter()
        .find_map(|pattern| try_separator(pattern, &cleaned))
        .unwrap_or(SongTitle {
            artist: String::new(),
            song_name: cleaned,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(title: &str) -> (String, String) {
        let result = split_title(title);
        (result.song_name, result.artist)
    }

    #[test]
    fn test_hyphen_with_bracket_tag() {
        assert_eq!(
            split("Sầu Tím Thiệp Hồng - Lệ Quyên (Official MV)"),
            ("Sầu Tím Thiệp Hồng".to_string(), "Lệ Quyên".to_string())
        );
    }

    #[test]
    fn test_no_separator() {
        assert_eq!(split("Đêm Đông"), ("Đêm Đông".to_string(), String::new()));
    }

    #[test]
    fn test_dash_variants_and_other_separators() {
        assert_eq!(split("Hello – Adele").1, "Adele");
        assert_eq!(split("Hello — Adele").1, "Adele");
        assert_eq!(split("Em Gái Mưa | Hương Tràm"), ("Em Gái Mưa".into(), "Hương Tràm".into()));
        assert_eq!(split("Duyên Phận: Như Quỳnh"), ("Duyên Phận".into(), "Như Quỳnh".into()));
        assert_eq!(split("Song Name \"quang lê\""), ("Song Name".into(), "Quang Lê".into()));
    }

    #[test]
    fn test_artist_filler_removed() {
        assert_eq!(
            split("Mưa Rừng - Beat Chuẩn Tone Nam | Quang Lê"),
            ("Mưa Rừng".into(), "Quang Lê".into())
        );
        assert_eq!(split("Shape Of You - ed sheeran ft. someone").1, "Ed Sheeran Someone");
    }

    #[test]
    fn test_empty_artist_falls_through_to_song_name_only() {
        assert_eq!(
            split("Karaoke Song - Tone Nữ"),
            ("Karaoke Song - Tone Nữ".to_string(), String::new())
        );
    }

    #[test]
    fn test_later_separator_used_when_first_yields_no_artist() {
        // Hyphen split leaves only filler; the pipe split finds an artist
        assert_eq!(
            split("Đêm Đông | Bằng Kiều - Karaoke"),
            ("Đêm Đông".into(), "Bằng Kiều".into())
        );
    }

    #[test]
    fn test_clean_title_strips_brackets_and_phrases() {
        assert_eq!(clean_title("Song [Lyrics] 【MV】 「Live」 (Official)"), "Song");
        assert_eq!(clean_title("Song ((nested)) extra"), "Song extra");
        assert_eq!(clean_title("Song Official Music Video"), "Song");
        assert_eq!(clean_title("Olivia   Audio"), "Olivia");
    }

    #[test]
    fn test_clean_artist_name() {
        assert_eq!(clean_artist_name("LỆ QUYÊN"), "Lệ Quyên");
        assert_eq!(clean_artist_name("giọng nữ karaoke"), "");
        assert_eq!(clean_artist_name("a Đàm Vĩnh Hưng x"), "Đàm Vĩnh Hưng");
    }
}
