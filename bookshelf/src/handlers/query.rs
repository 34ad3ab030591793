//! Query parameters for the book list endpoint
//!
//! # Example
//!
//! ```rust
//! use bookshelf::handlers::BookListQuery;
//!
//! let query = BookListQuery {
//!     author: Some("tolk".to_string()),
//!     year: Some("1954".to_string()),
//! };
//! assert_eq!(query.filters().unwrap().len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiOperation};
use crate::books::FieldErrors;
use crate::repository::FilterCondition;

/// `?author=<substring>&year=<integer>`
///
/// Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookListQuery {
    /// Case-insensitive substring of the author name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Exact publication year; kept as text so a bad value becomes a field error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl BookListQuery {
    /// Translate the parameters into store filters
    ///
    /// # Errors
    ///
    /// A `year` that is not an integer yields a validation error keyed on
    /// `year`.
    pub fn filters(&self) -> Result<Vec<FilterCondition>, ApiError> {
        let mut filters = Vec::new();

        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            filters.push(FilterCondition::icontains("author", author));
        }

        if let Some(year) = self.year.as_deref().filter(|y| !y.is_empty()) {
            let year: i64 = year.trim().parse().map_err(|_| {
                ApiError::validation_failed(FieldErrors::single(
                    "year",
                    "A valid integer is required.",
                ))
                .with_operation(ApiOperation::List)
            })?;
            filters.push(FilterCondition::eq("published_year", year));
        }

        Ok(filters)
    }
}
