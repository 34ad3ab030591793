//! Book entity and its wire representations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of characters kept in [`BookSummary::short_summary`]
pub const SHORT_SUMMARY_CHARS: usize = 100;

/// Store-assigned book identifier
///
/// Parsing accepts ASCII digits only, matching the `/books/{id}/` route
/// converter: signs, whitespace and anything else are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    /// Wrap a raw identifier
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw identifier
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BookId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Error returned when a path segment is not a book identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid book id: {0:?}")]
pub struct InvalidBookId(pub String);

impl FromStr for BookId {
    type Err = InvalidBookId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidBookId(s.to_string()));
        }
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| InvalidBookId(s.to_string()))
    }
}

/// A stored book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub summary: String,
}

impl Book {
    /// Build a stored book from an assigned id and validated input
    pub fn from_input(id: BookId, input: BookInput) -> Self {
        Self {
            id,
            title: input.title,
            author: input.author,
            published_year: input.published_year,
            summary: input.summary,
        }
    }

    /// Reduced representation served by the summary endpoint
    pub fn to_summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            title: self.title.clone(),
            short_summary: short_summary(&self.summary),
        }
    }
}

/// Validated candidate for create and full update
///
/// Produced only by [`crate::books::BookSerializer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub summary: String,
}

/// Validated partial update; `None` fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_year: Option<i32>,
    pub summary: Option<String>,
}

impl BookPatch {
    /// Merge onto an existing book, yielding the full replacement input
    pub fn apply_to(self, book: &Book) -> BookInput {
        BookInput {
            title: self.title.unwrap_or_else(|| book.title.clone()),
            author: self.author.unwrap_or_else(|| book.author.clone()),
            published_year: self.published_year.unwrap_or(book.published_year),
            summary: self.summary.unwrap_or_else(|| book.summary.clone()),
        }
    }
}

/// `{id, title, short_summary}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub short_summary: String,
}

/// First [`SHORT_SUMMARY_CHARS`] characters of `summary`.
///
/// Counts Unicode scalar values, so multi-byte text is never cut inside a
/// character. No word-boundary handling.
pub fn short_summary(summary: &str) -> String {
    match summary.char_indices().nth(SHORT_SUMMARY_CHARS) {
        Some((byte_idx, _)) => summary[..byte_idx].to_string(),
        None => summary.to_string(),
    }
}
