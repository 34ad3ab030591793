//! Book storage
//!
//! The HTTP layer talks to storage only through the [`Repository`] trait, so
//! the same handlers run against either backend:
//!
//! - [`MemoryBookRepository`]: an in-process map, used when no database is
//!   configured and by the tests
//! - [`PgBookRepository`]: PostgreSQL via `sqlx` (feature `database`)
//!
//! # Example
//!
//! ```rust
//! use bookshelf::books::BookInput;
//! use bookshelf::repository::{FilterCondition, MemoryBookRepository, Repository};
//!
//! # tokio_test_block(async {
//! let repo = MemoryBookRepository::new();
//! repo.create(BookInput {
//!     title: "Dune".into(),
//!     author: "Frank Herbert".into(),
//!     published_year: 1965,
//!     summary: "Spice and sand.".into(),
//! })
//! .await
//! .unwrap();
//!
//! let found = repo
//!     .find_all(&[FilterCondition::icontains("author", "HERB")])
//!     .await
//!     .unwrap();
//! assert_eq!(found.len(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod error;
mod filter;
mod memory;
#[cfg(feature = "database")]
mod postgres;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use filter::{FilterCondition, FilterOperator, FilterValue};
pub use memory::MemoryBookRepository;
#[cfg(feature = "database")]
pub use postgres::PgBookRepository;
pub use traits::{BookRepository, Repository, RepositoryResult, BOOK_FILTER_FIELDS};
