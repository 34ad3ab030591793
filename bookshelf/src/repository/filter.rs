//! Filter types for repository queries
//!
//! Filters are conjunctive: an entity matches a filter list only when it
//! satisfies every condition in it. An empty list matches everything.
//!
//! # Example
//!
//! ```rust
//! use bookshelf::repository::FilterCondition;
//!
//! let filters = vec![
//!     FilterCondition::icontains("author", "tolk"),
//!     FilterCondition::eq("published_year", 1954_i64),
//! ];
//! assert_eq!(filters.len(), 2);
//! ```

use std::fmt;

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Exact equality (=)
    Equal,
    /// Case-insensitive substring match (ILIKE '%value%')
    ContainsIgnoreCase,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::ContainsIgnoreCase => write!(f, "ILIKE"),
        }
    }
}

/// A value that can be used in filter conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// String value
    String(String),
    /// 64-bit integer value
    Integer(i64),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{:?}", s),
            Self::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

/// A single filter condition for querying entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// Create a case-insensitive substring filter
    pub fn icontains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(
            field,
            FilterOperator::ContainsIgnoreCase,
            FilterValue::String(needle.into()),
        )
    }

    /// Evaluate the condition against a string field value
    pub fn matches_str(&self, actual: &str) -> bool {
        match (&self.operator, &self.value) {
            (FilterOperator::Equal, FilterValue::String(expected)) => actual == expected,
            (FilterOperator::ContainsIgnoreCase, FilterValue::String(needle)) => {
                actual.to_lowercase().contains(&needle.to_lowercase())
            }
            (_, FilterValue::Integer(_)) => false,
        }
    }

    /// Evaluate the condition against an integer field value
    pub fn matches_int(&self, actual: i64) -> bool {
        match (&self.operator, &self.value) {
            (FilterOperator::Equal, FilterValue::Integer(expected)) => actual == *expected,
            (FilterOperator::ContainsIgnoreCase, FilterValue::String(needle)) => {
                actual.to_string().contains(needle.as_str())
            }
            _ => false,
        }
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}
