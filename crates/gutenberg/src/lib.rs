//! Book identifiers, raw-text validation/splitting, and the Gutenberg downloader.

pub mod book_id;
pub mod downloader;
pub mod metadata;
pub mod parser;

pub use book_id::BookId;
pub use downloader::Downloader;
pub use metadata::{extract_metadata, BookMetadata};
pub use parser::split_header_body;
