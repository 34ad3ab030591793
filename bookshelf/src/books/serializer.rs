//! Validation and marshalling of candidate book representations
//!
//! Request bodies arrive as raw JSON. The serializer checks every writable
//! field, collects all failures into a [`FieldErrors`] map keyed by field name,
//! and only hands out a [`BookInput`] or [`BookPatch`] when the whole body is
//! valid. `id` is read-only and unknown keys are ignored.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::model::{BookInput, BookPatch};

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";
const INVALID_STRING: &str = "Not a valid string.";
const INVALID_INTEGER: &str = "A valid integer is required.";

/// Key used for errors that do not belong to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field-keyed validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single message under `field`
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Field names with at least one message, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Why a request body could not become a book candidate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializerError {
    /// The body is not well-formed JSON
    #[error("JSON parse error - {0}")]
    Parse(String),

    /// The body is JSON but not an object
    #[error("Invalid data. Expected a dictionary, but got {0}.")]
    NotAnObject(&'static str),

    /// One or more fields failed validation
    #[error("Invalid input in fields: {}", .0.fields().collect::<Vec<_>>().join(", "))]
    Fields(FieldErrors),
}

impl From<FieldErrors> for SerializerError {
    fn from(errors: FieldErrors) -> Self {
        Self::Fields(errors)
    }
}

/// Stateless validator for the Book resource
#[derive(Debug, Clone, Copy, Default)]
pub struct BookSerializer;

impl BookSerializer {
    /// Parse a request body into a JSON object
    ///
    /// An empty or whitespace-only body is read as `{}`.
    pub fn parse_body(body: &[u8]) -> Result<Map<String, Value>, SerializerError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        let value: Value =
            serde_json::from_slice(body).map_err(|e| SerializerError::Parse(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(SerializerError::NotAnObject(json_type_name(&other))),
        }
    }

    /// Validate a body for create or full update; every field is required
    pub fn validate(body: &[u8]) -> Result<BookInput, SerializerError> {
        let data = Self::parse_body(body)?;
        Ok(Self::validate_map(&data)?)
    }

    /// Validate a body for partial update; absent fields are left unset
    pub fn validate_partial(body: &[u8]) -> Result<BookPatch, SerializerError> {
        let data = Self::parse_body(body)?;
        Ok(Self::validate_partial_map(&data)?)
    }

    pub fn validate_map(data: &Map<String, Value>) -> Result<BookInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = required(&mut errors, data, "title", text_field);
        let author = required(&mut errors, data, "author", text_field);
        let published_year = required(&mut errors, data, "published_year", integer_field);
        let summary = required(&mut errors, data, "summary", text_field);

        match (title, author, published_year, summary) {
            (Some(title), Some(author), Some(published_year), Some(summary)) => {
                errors.into_result(BookInput {
                    title,
                    author,
                    published_year,
                    summary,
                })
            }
            _ => Err(errors),
        }
    }

    pub fn validate_partial_map(data: &Map<String, Value>) -> Result<BookPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let patch = BookPatch {
            title: optional(&mut errors, data, "title", text_field),
            author: optional(&mut errors, data, "author", text_field),
            published_year: optional(&mut errors, data, "published_year", integer_field),
            summary: optional(&mut errors, data, "summary", text_field),
        };
        errors.into_result(patch)
    }
}

fn required<T>(
    errors: &mut FieldErrors,
    data: &Map<String, Value>,
    field: &str,
    convert: fn(&Value) -> Result<T, String>,
) -> Option<T> {
    match data.get(field) {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(value) => checked(errors, field, value, convert),
    }
}

fn optional<T>(
    errors: &mut FieldErrors,
    data: &Map<String, Value>,
    field: &str,
    convert: fn(&Value) -> Result<T, String>,
) -> Option<T> {
    data.get(field)
        .and_then(|value| checked(errors, field, value, convert))
}

fn checked<T>(
    errors: &mut FieldErrors,
    field: &str,
    value: &Value,
    convert: fn(&Value) -> Result<T, String>,
) -> Option<T> {
    if value.is_null() {
        errors.add(field, NOT_NULL);
        return None;
    }
    match convert(value) {
        Ok(v) => Some(v),
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

/// Strings are trimmed; numbers are accepted in their textual form.
fn text_field(value: &Value) -> Result<String, String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(INVALID_STRING.to_string()),
    };
    if text.is_empty() {
        return Err(NOT_BLANK.to_string());
    }
    Ok(text)
}

/// Integers, integral floats and integer-valued strings, bounded to i32.
fn integer_field(value: &Value) -> Result<i32, String> {
    let wide: i128 = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i128::from(i)
            } else if let Some(u) = n.as_u64() {
                i128::from(u)
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e30 => f as i128,
                    _ => return Err(INVALID_INTEGER.to_string()),
                }
            }
        }
        Value::String(s) => strip_zero_fraction(s.trim())
            .parse::<i128>()
            .map_err(|_| INVALID_INTEGER.to_string())?,
        _ => return Err(INVALID_INTEGER.to_string()),
    };

    if wide > i128::from(i32::MAX) {
        return Err(format!(
            "Ensure this value is less than or equal to {}.",
            i32::MAX
        ));
    }
    if wide < i128::from(i32::MIN) {
        return Err(format!(
            "Ensure this value is greater than or equal to {}.",
            i32::MIN
        ));
    }
    Ok(wide as i32)
}

/// `"1954.0"` and `"1954."` read as `"1954"`
fn strip_zero_fraction(text: &str) -> &str {
    match text.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => whole,
        _ => text,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_valid_body() {
        let input = BookSerializer::validate(&body(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "published_year": 1965,
            "summary": "Spice and sand.",
        })))
        .unwrap();
        assert_eq!(input.title, "Dune");
        assert_eq!(input.published_year, 1965);
    }

    #[test]
    fn test_id_and_unknown_fields_ignored() {
        let input = BookSerializer::validate(&body(json!({
            "id": 999,
            "title": "Dune",
            "author": "Frank Herbert",
            "published_year": 1965,
            "summary": "Spice and sand.",
            "isbn": "0441013597",
        })))
        .unwrap();
        assert_eq!(input.author, "Frank Herbert");
    }

    #[test]
    fn test_missing_title_reported() {
        let err = BookSerializer::validate(&body(json!({
            "author": "Frank Herbert",
            "published_year": 1965,
            "summary": "Spice and sand.",
        })))
        .unwrap_err();
        let SerializerError::Fields(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(errors.get("title"), Some(&[REQUIRED.to_string()][..]));
        assert!(errors.get("author").is_none());
    }

    #[test]
    fn test_all_errors_collected() {
        let err = BookSerializer::validate(&body(json!({
            "title": "   ",
            "author": null,
            "published_year": "nineteen",
        })))
        .unwrap_err();
        let SerializerError::Fields(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["author", "published_year", "summary", "title"]
        );
        assert_eq!(errors.get("title").unwrap()[0], NOT_BLANK);
        assert_eq!(errors.get("author").unwrap()[0], NOT_NULL);
        assert_eq!(errors.get("published_year").unwrap()[0], INVALID_INTEGER);
        assert_eq!(errors.get("summary").unwrap()[0], REQUIRED);
    }

    #[test]
    fn test_text_rules() {
        assert_eq!(text_field(&json!("  Dune  ")), Ok("Dune".to_string()));
        assert_eq!(text_field(&json!(42)), Ok("42".to_string()));
        assert_eq!(text_field(&json!(true)), Err(INVALID_STRING.to_string()));
        assert_eq!(text_field(&json!(["a"])), Err(INVALID_STRING.to_string()));
        assert_eq!(text_field(&json!("")), Err(NOT_BLANK.to_string()));
    }

    #[test]
    fn test_integer_rules() {
        assert_eq!(integer_field(&json!(1954)), Ok(1954));
        assert_eq!(integer_field(&json!("1954")), Ok(1954));
        assert_eq!(integer_field(&json!(" -44 ")), Ok(-44));
        assert_eq!(integer_field(&json!(1954.0)), Ok(1954));
        assert_eq!(integer_field(&json!("1954.0")), Ok(1954));
        assert_eq!(integer_field(&json!("1954.")), Ok(1954));
        assert_eq!(integer_field(&json!("1954.5")), Err(INVALID_INTEGER.to_string()));
        assert_eq!(integer_field(&json!(".0")), Err(INVALID_INTEGER.to_string()));
        assert_eq!(integer_field(&json!(1954.5)), Err(INVALID_INTEGER.to_string()));
        assert_eq!(integer_field(&json!(false)), Err(INVALID_INTEGER.to_string()));
        assert!(integer_field(&json!(3_000_000_000_i64))
            .unwrap_err()
            .starts_with("Ensure this value is less than or equal to"));
        assert!(integer_field(&json!(-3_000_000_000_i64))
            .unwrap_err()
            .starts_with("Ensure this value is greater than or equal to"));
    }

    #[test]
    fn test_non_object_body() {
        assert_eq!(
            BookSerializer::validate(b"[1, 2]").unwrap_err(),
            SerializerError::NotAnObject("list")
        );
        assert_eq!(
            BookSerializer::validate(b"\"text\"")
                .unwrap_err()
                .to_string(),
            "Invalid data. Expected a dictionary, but got str."
        );
    }

    #[test]
    fn test_empty_body_reads_as_empty_object() {
        assert!(BookSerializer::parse_body(b"").unwrap().is_empty());
        assert!(BookSerializer::parse_body(b" \n\t").unwrap().is_empty());

        let SerializerError::Fields(errors) = BookSerializer::validate(b"").unwrap_err() else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["author", "published_year", "summary", "title"]
        );
        assert_eq!(BookSerializer::validate_partial(b"").unwrap(), BookPatch::default());
    }

    #[test]
    fn test_malformed_json() {
        let err = BookSerializer::validate(b"{\"title\": ").unwrap_err();
        assert!(matches!(err, SerializerError::Parse(_)));
        assert!(err.to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn test_partial_accepts_subset() {
        let patch = BookSerializer::validate_partial(&body(json!({"title": "Children of Dune"})))
            .unwrap();
        assert_eq!(patch.title.as_deref(), Some("Children of Dune"));
        assert!(patch.author.is_none());
        assert!(patch.published_year.is_none());
    }

    #[test]
    fn test_partial_still_validates_present_fields() {
        let err = BookSerializer::validate_partial(&body(json!({"published_year": "soon"})))
            .unwrap_err();
        let SerializerError::Fields(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["published_year"]);
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let errors = FieldErrors::single("title", REQUIRED);
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"title": ["This field is required."]})
        );
    }
}
