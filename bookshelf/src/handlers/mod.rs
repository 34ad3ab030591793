//! HTTP handlers for the Book resource
//!
//! - [`list_books`] / [`create_book`]: `GET` / `POST /books/`
//! - [`get_book`], [`update_book`], [`partial_update_book`], [`delete_book`]:
//!   `GET` / `PUT` / `PATCH` / `DELETE /books/{id}/`
//! - [`book_summary`]: `GET /books/{id}/summary/`
//!
//! Failures are returned as [`ApiError`], which renders a JSON body with the
//! matching status code:
//!
//! ```json
//! {
//!   "error": "Invalid input.",
//!   "code": "VALIDATION_FAILED",
//!   "status": 400,
//!   "operation": "create",
//!   "fields": { "title": ["This field is required."] }
//! }
//! ```

mod books;
mod error;
mod query;

pub use books::{
    book_summary, create_book, delete_book, get_book, list_books, partial_update_book,
    update_book,
};
pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use query::BookListQuery;
