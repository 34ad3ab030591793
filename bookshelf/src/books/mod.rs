//! The Book resource
//!
//! - [`Book`]: the stored entity, serialized with the wire field names
//!   `id`, `title`, `author`, `published_year`, `summary`
//! - [`BookSummary`]: the reduced `{id, title, short_summary}` view
//! - [`BookSerializer`]: turns raw request bodies into validated
//!   [`BookInput`] / [`BookPatch`] values or field-keyed errors

mod model;
mod serializer;

pub use model::{
    short_summary, Book, BookId, BookInput, BookPatch, BookSummary, InvalidBookId,
    SHORT_SUMMARY_CHARS,
};
pub use serializer::{BookSerializer, FieldErrors, SerializerError, NON_FIELD_ERRORS};

/// Entity name used in error context and logs
pub const ENTITY: &str = "Book";
