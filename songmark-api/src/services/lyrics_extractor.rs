//! Lyrics extraction from free-text video descriptions
//!
//! Ordered strategies, each returning the raw captured block. The first
//! block that still has more than [`MIN_LYRICS_CHARS`] characters after
//! cleaning wins. When every strategy misses, a line-by-line prose scan is
//! the last resort. An empty string means "no lyrics found".

use once_cell::sync::Lazy;
use regex::Regex;

/// Cleaned blocks must be longer than this to count as lyrics
pub const MIN_LYRICS_CHARS: usize = 20;

/// Prose lines needed by the fallback scan
const MIN_PROSE_LINES: usize = 3;

type Strategy = fn(&str) -> Option<String>;

/// Strategies in priority order
const STRATEGIES: &[(&str, Strategy)] = &[
    ("labeled block", labeled_block),
    ("quoted span", quoted_span),
    ("parenthesized span", parenthesized_span),
    ("capitalized lines", capitalized_lines),
    ("verse/chorus block", verse_chorus_block),
];

/// `Lyrics:` / `Lời bài hát -` header ending the line
static LABEL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:lyrics?|lời bài hát|lời ca)[ \t]*[-:][ \t]*\n").unwrap()
});

static QUOTED_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)["'“”]([^"'“”]*(?:lyrics?|lời bài hát|lời ca)[^"'“”]*)["'“”]"#).unwrap()
});

static PARENTHESIZED_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(([^)]*(?:lyrics?|lời bài hát|lời ca)[^)]*)\)").unwrap()
});

/// Three consecutive lines made only of capitalized words
static CAPITALIZED_LINES: Lazy<Regex> = Lazy::new(|| {
    let line = r"\p{Lu}\p{Ll}+(?:[ \t]+\p{Lu}\p{Ll}+)*";
    Regex::new(&format!(r"{line}[ \t]*\n{line}[ \t]*\n{line}", line = line)).unwrap()
});

static VERSE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:verse|chorus)(?:[ \t]*\d+)?[ \t]*:?[ \t]*\n").unwrap()
});

static NEXT_VERSE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\n[ \t]*(?:verse|chorus)\b").unwrap());

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Letters, marks, whitespace and ordinary punctuation only
static PROSE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[\p{L}\p{M}\s.,!?;:'"()-]+$"#).unwrap());

static ALL_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

static ALL_UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{Lu}\s]+$").unwrap());

/// Extract a lyrics block from a description, or an empty string
pub fn extract_lyrics(description: &str) -> String {
    if description.trim().is_empty() {
        return String::new();
    }

    let text = description.replace("\r\n", "\n");

    for (name, strategy) in STRATEGIES {
        if let Some(raw) = strategy(&text) {
            let cleaned = clean_lyrics(&raw);
            if cleaned.chars().count() > MIN_LYRICS_CHARS {
                tracing::debug!(strategy = *name, "Lyrics found in description");
                return cleaned;
            }
        }
    }

    prose_lines(&text).unwrap_or_default()
}

/// Labeled block: lines after the header until a blank line or a capitalized line
fn labeled_block(text: &str) -> Option<String> {
    let header = LABEL_HEADER.find(text)?;
    let mut lines = text[header.end()..]
        .split('\n')
        .skip_while(|line| line.trim().is_empty());

    let mut block = vec![lines.next()?];
    for line in lines {
        let starts_capitalized = line.chars().next().is_some_and(char::is_uppercase);
        if line.trim().is_empty() || starts_capitalized {
            break;
        }
        block.push(line);
    }

    Some(block.join("\n"))
}

fn quoted_span(text: &str) -> Option<String> {
    first_capture(&QUOTED_LABEL, text)
}

fn parenthesized_span(text: &str) -> Option<String> {
    first_capture(&PARENTHESIZED_LABEL, text)
}

fn capitalized_lines(text: &str) -> Option<String> {
    CAPITALIZED_LINES.find(text).map(|m| m.as_str().to_string())
}

/// Verse/chorus block: everything up to the next verse/chorus label
fn verse_chorus_block(text: &str) -> Option<String> {
    let header = VERSE_HEADER.find(text)?;
    let rest = &text[header.end()..];
    let end = NEXT_VERSE_LABEL
        .find(rest)
        .map(|m| m.start())
        .unwrap_or(rest.len());
    Some(rest[..end].to_string())
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn is_lyrics_char(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || ".,!?;:'\"()-_".contains(c)
}

/// Trim lines, collapse blank runs, drop unusual characters
pub fn clean_lyrics(raw: &str) -> String {
    let trimmed_lines = raw
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    let collapsed = EXCESS_NEWLINES.replace_all(trimmed_lines.trim(), "\n\n");

    collapsed
        .chars()
        .filter(|c| is_lyrics_char(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_prose_line(line: &str) -> bool {
    let length = line.chars().count();
    length > 10
        && length < 100
        && PROSE_LINE.is_match(line)
        && !line.contains("http")
        && !line.contains('@')
        && !line.contains('#')
        && !ALL_DIGITS.is_match(line)
        && !ALL_UPPERCASE.is_match(line)
        && line.split_whitespace().count() > 2
}

/// Last resort: at least three plain prose lines
fn prose_lines(text: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| is_prose_line(line))
        .collect();

    if lines.len() >= MIN_PROSE_LINES {
        tracing::debug!(lines = lines.len(), "Lyrics guessed from prose lines");
        Some(lines.join("\n"))
    } else {
        None
    }
}
