//! Query tokenization (spec.md §4.4): lowercase and split on whitespace
//! runs only — unlike body tokenization, no stopword or length filtering
//! is applied to the query.

pub fn tokenize_query(q: &str) -> Vec<String> {
    q.to_lowercase().split_whitespace().map(|s| s.to_string()).collect()
}
