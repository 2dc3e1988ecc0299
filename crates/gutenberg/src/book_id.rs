//! `BookId` — positive integer, globally unique across the corpus, immutable (spec.md §3).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(u32);

impl BookId {
    /// Fails if `value` is zero; book identifiers are strictly positive.
    pub fn new(value: u32) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(BookId(value))
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for BookId {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        BookId::new(value).ok_or(())
    }
}

impl From<BookId> for u32 {
    fn from(id: BookId) -> u32 {
        id.0
    }
}
