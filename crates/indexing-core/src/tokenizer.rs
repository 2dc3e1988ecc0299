//! Body tokenization (spec.md §4.3): lowercase, split on whitespace/punctuation
//! runs, keep alphabetic substrings of length >= 3, drop stopwords, collapse
//! to a set (one occurrence per body per term).

use crate::stopwords::is_stopword;
use std::collections::HashSet;

/// Tokenizes `text` into the set of indexable terms.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| word.len() >= 3)
        .filter(|word| !is_stopword(word))
        .map(|word| word.to_string())
        .collect()
}
