//! # bookshelf
//!
//! A small CRUD service for books over HTTP and JSON.
//!
//! ## Features
//!
//! - **Books**: list with `author` / `year` filters, create, retrieve, replace,
//!   partially update and delete under `/books/`
//! - **Summaries**: `/books/{id}/summary/` returns the first 100 characters of
//!   a book's summary
//! - **Storage**: PostgreSQL through `sqlx` (feature `database`), or an
//!   in-memory store when no database is configured
//! - **Operations**: layered configuration, JSON logs, request ids, liveness
//!   and readiness probes, graceful shutdown
//!
//! ## Example
//!
//! ```rust,no_run
//! use bookshelf::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     run(config, MemoryBookRepository::new()).await
//! }
//! ```

pub mod books;
pub mod config;
#[cfg(feature = "database")]
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::books::{Book, BookId, BookInput, BookPatch, BookSerializer, BookSummary};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{ApiError, ApiErrorKind, BookListQuery};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        BookRepository, FilterCondition, MemoryBookRepository, Repository, RepositoryError,
    };
    #[cfg(feature = "database")]
    pub use crate::repository::PgBookRepository;
    pub use crate::routes::app;
    pub use crate::server::{run, Server};
    pub use crate::state::AppState;
}
