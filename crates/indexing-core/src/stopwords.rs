//! The fixed stopword list from spec.md §4.3.

use std::collections::HashSet;
use std::sync::OnceLock;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "he",
    "her", "hers", "him", "his", "i", "in", "is", "it", "its", "me", "my", "not", "of", "on",
    "or", "our", "she", "so", "that", "the", "their", "them", "they", "this", "to", "was", "we",
    "were", "with", "you", "your",
];

pub fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

pub fn is_stopword(word: &str) -> bool {
    stopwords().contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_is_a_stopword() {
        assert!(is_stopword("the"));
    }

    #[test]
    fn alice_is_not_a_stopword() {
        assert!(!is_stopword("alice"));
    }
}
