//! Bibliographic metadata extraction from a Gutenberg header (spec.md §3).

use crate::book_id::BookId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const TITLE_MAX_CHARS: usize = 300;

/// Tuple `(bookId, title, author, language, year, path)` per spec.md §3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub language: String,
    pub year: Option<u32>,
    pub path: String,
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Title:\s*(.+)").unwrap())
}

fn author_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Author:\s*(.+)").unwrap())
}

fn language_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Language:\s*(.+)").unwrap())
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Release Date:\s*.*?(\d{4})").unwrap())
}

/// Trims, collapses internal whitespace runs to single spaces.
fn clean(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_title(title: String) -> String {
    if title.chars().count() <= TITLE_MAX_CHARS {
        return title;
    }
    let truncated: String = title.chars().take(TITLE_MAX_CHARS).collect();
    format!("{truncated}...")
}

/// Extracts `BookMetadata` from raw header text, applying the defaults in
/// spec.md §3 when a field is absent.
pub fn extract_metadata(header: &str, book_id: BookId, path: String) -> BookMetadata {
    let title = title_re()
        .captures(header)
        .and_then(|c| c.get(1))
        .map(|m| truncate_title(clean(m.as_str())))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Unknown Title (Book {book_id})"));

    let author = author_re()
        .captures(header)
        .and_then(|c| c.get(1))
        .map(|m| clean(m.as_str()))
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| "Unknown Author".to_string());

    let language = language_re()
        .captures(header)
        .and_then(|c| c.get(1))
        .map(|m| clean(m.as_str()).to_lowercase())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "en".to_string());

    let year = year_re()
        .captures(header)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    BookMetadata {
        book_id,
        title,
        author,
        language,
        year,
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> BookId {
        BookId::new(n).unwrap()
    }

    #[test]
    fn extracts_all_fields() {
        let header = "Title: Alice\nAuthor: Carroll\nLanguage: English\nRelease Date: June 25, 2008\n";
        let m = extract_metadata(header, id(11), "/data/11".to_string());
        assert_eq!(m.title, "Alice");
        assert_eq!(m.author, "Carroll");
        assert_eq!(m.language, "english");
        assert_eq!(m.year, Some(2008));
    }

    #[test]
    fn defaults_when_absent() {
        let m = extract_metadata("no useful lines here", id(7), "/data/7".to_string());
        assert_eq!(m.title, "Unknown Title (Book 7)");
        assert_eq!(m.author, "Unknown Author");
        assert_eq!(m.language, "en");
        assert_eq!(m.year, None);
    }

    #[test]
    fn collapses_whitespace_runs() {
        let header = "Title:   The   Wind    in the\tWillows\n";
        let m = extract_metadata(header, id(1), "/data/1".to_string());
        assert_eq!(m.title, "The Wind in the Willows");
    }

    #[test]
    fn truncates_long_titles_with_ellipsis() {
        let long_title = "a".repeat(400);
        let header = format!("Title: {long_title}\n");
        let m = extract_metadata(&header, id(1), "/data/1".to_string());
        assert_eq!(m.title.chars().count(), TITLE_MAX_CHARS + 3);
        assert!(m.title.ends_with("..."));
    }

    #[test]
    fn year_parses_from_release_date_line() {
        let header = "Release Date: January 1, 1995 [EBook #1]\n";
        let m = extract_metadata(header, id(1), "/data/1".to_string());
        assert_eq!(m.year, Some(1995));
    }
}
