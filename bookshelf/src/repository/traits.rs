//! Repository trait definitions
//!
//! Async methods use RPITIT (return position `impl Trait` in traits), so no
//! `async_trait` boxing is needed. Implementations are cheap to clone and are
//! handed to the HTTP layer explicitly through application state.

use std::future::Future;

use super::error::RepositoryError;
use super::filter::FilterCondition;
use crate::books::{Book, BookId, BookInput};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Base repository trait for CRUD operations
///
/// # Type Parameters
///
/// - `Id`: the identifier type for the entity
/// - `Entity`: the full entity type returned from queries
/// - `Create`: the validated payload for inserting entities
/// - `Update`: the validated payload for overwriting entities
pub trait Repository<Id, Entity, Create, Update>: Send + Sync {
    /// Find an entity by its unique identifier
    ///
    /// Returns `Ok(None)` when no entity has that identifier.
    fn find_by_id(&self, id: &Id) -> impl Future<Output = RepositoryResult<Option<Entity>>> + Send;

    /// Find all entities matching every filter, in the store's natural order
    fn find_all(
        &self,
        filters: &[FilterCondition],
    ) -> impl Future<Output = RepositoryResult<Vec<Entity>>> + Send;

    /// Count entities matching every filter
    fn count(
        &self,
        filters: &[FilterCondition],
    ) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Insert a new entity and return it with its assigned identifier
    fn create(&self, data: Create) -> impl Future<Output = RepositoryResult<Entity>> + Send;

    /// Overwrite an existing entity
    ///
    /// # Errors
    ///
    /// `NotFound` if the entity doesn't exist.
    fn update(
        &self,
        id: &Id,
        data: Update,
    ) -> impl Future<Output = RepositoryResult<Entity>> + Send;

    /// Delete an entity permanently
    ///
    /// Returns `true` if the entity was deleted, `false` if it didn't exist.
    fn delete(&self, id: &Id) -> impl Future<Output = RepositoryResult<bool>> + Send;
}

/// The book store contract consumed by the HTTP handlers
pub trait BookRepository:
    Repository<BookId, Book, BookInput, BookInput> + Clone + 'static
{
}

impl<T> BookRepository for T where T: Repository<BookId, Book, BookInput, BookInput> + Clone + 'static {}

/// Field names a book store accepts in filters
pub const BOOK_FILTER_FIELDS: &[&str] = &["title", "author", "published_year", "summary"];
