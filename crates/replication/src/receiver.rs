//! Receiver-side rehydration (spec.md §4.5): what a peer does with a
//! replicated book once it arrives over `/api/datalake/store`. Replicated
//! books are saved but never themselves re-replicated or re-queued.

use common::AppError;
use datalake::Datalake;
use gutenberg::BookId;

/// Parses `raw_content` (§4.2) and saves the resulting header/body pair
/// under `id`, returning the path it was written to.
pub fn rehydrate(datalake: &Datalake, id: BookId, raw_content: &str) -> Result<String, AppError> {
    let (header, body) = gutenberg::split_header_body(raw_content)?;
    datalake.save(id, &header, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rehydrates_a_replicated_book() {
        let dir = tempfile::tempdir().unwrap();
        let lake = Datalake::bucket(dir.path(), "tracking.txt", 1000);
        let raw = "Title: Alice\n\n*** START OF\nwhite rabbit\n*** END OF";

        let path = rehydrate(&lake, BookId::new(11).unwrap(), raw).unwrap();
        assert!(!path.is_empty());
        assert!(lake.is_present(BookId::new(11).unwrap()));
        assert_eq!(lake.read_body(BookId::new(11).unwrap()).unwrap(), "white rabbit");
    }

    #[test]
    fn rejects_malformed_content() {
        let dir = tempfile::tempdir().unwrap();
        let lake = Datalake::bucket(dir.path(), "tracking.txt", 1000);
        let result = rehydrate(&lake, BookId::new(11).unwrap(), "no markers here");
        assert!(matches!(result, Err(AppError::BookFormat(_))));
    }
}
