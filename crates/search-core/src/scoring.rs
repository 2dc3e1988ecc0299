//! Filtering and additive scoring (spec.md §4.4).

use gutenberg::BookMetadata;
use std::collections::HashSet;

/// Optional, AND-combined filters applied to candidates before scoring.
#[derive(Debug, Default, Clone)]
pub struct SearchFilters {
    pub author: Option<String>,
    pub language: Option<String>,
    pub year: Option<u32>,
}

impl SearchFilters {
    pub fn matches(&self, metadata: &BookMetadata) -> bool {
        if let Some(author) = &self.author {
            if !metadata.author.to_lowercase().contains(&author.to_lowercase()) {
                return false;
            }
        }
        if let Some(language) = &self.language {
            if !metadata.language.eq_ignore_ascii_case(language) {
                return false;
            }
        }
        if let Some(year) = self.year {
            if metadata.year != Some(year) {
                return false;
            }
        }
        true
    }
}

/// Additive score for one candidate against the full set of query tokens:
/// +10 per token the title contains, +5 per token the author contains,
/// +1 per token whose postings contain this book's identifier.
pub fn score(metadata: &BookMetadata, tokens: &[String], postings_by_token: &[HashSet<u32>]) -> u32 {
    let title = metadata.title.to_lowercase();
    let author = metadata.author.to_lowercase();
    let book_id = metadata.book_id.value();

    let mut total = 0u32;
    for (token, postings) in tokens.iter().zip(postings_by_token) {
        if title.contains(token.as_str()) {
            total += 10;
        }
        if author.contains(token.as_str()) {
            total += 5;
        }
        if postings.contains(&book_id) {
            total += 1;
        }
    }
    total
}
