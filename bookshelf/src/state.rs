//! Application state shared across handlers

use std::sync::Arc;

use crate::config::Config;
use crate::repository::BookRepository;

/// Configuration plus the book store
///
/// Cloned into every request; the store handle is cheap to clone and all
/// clones share the same underlying data.
#[derive(Debug, Clone)]
pub struct AppState<R> {
    config: Arc<Config>,
    books: R,
}

impl<R: BookRepository> AppState<R> {
    pub fn new(config: Config, books: R) -> Self {
        Self {
            config: Arc::new(config),
            books,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The book store
    pub fn books(&self) -> &R {
        &self.books
    }
}
