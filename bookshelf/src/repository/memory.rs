//! In-process book store
//!
//! Used when no database is configured and throughout the test-suite. Books
//! live in an ordered map so iteration follows ascending id, the same natural
//! order the PostgreSQL store returns. Identifiers come from a monotonically
//! increasing counter and are never handed out twice, even after deletes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::filter::FilterCondition;
use super::traits::{Repository, RepositoryResult};
use crate::books::{Book, BookId, BookInput, ENTITY};

/// Book store backed by a shared in-memory map
#[derive(Debug, Clone)]
pub struct MemoryBookRepository {
    books: Arc<RwLock<BTreeMap<BookId, Book>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for MemoryBookRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self {
            books: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn allocate_id(&self) -> BookId {
        BookId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

fn matches_all(
    book: &Book,
    filters: &[FilterCondition],
    operation: RepositoryOperation,
) -> RepositoryResult<bool> {
    for filter in filters {
        let hit = match filter.field.as_str() {
            "title" => filter.matches_str(&book.title),
            "author" => filter.matches_str(&book.author),
            "summary" => filter.matches_str(&book.summary),
            "published_year" => filter.matches_int(i64::from(book.published_year)),
            other => {
                return Err(RepositoryError::database_error(
                    operation,
                    format!("Unknown filter field: {}", other),
                ))
            }
        };
        if !hit {
            return Ok(false);
        }
    }
    Ok(true)
}

impl Repository<BookId, Book, BookInput, BookInput> for MemoryBookRepository {
    async fn find_by_id(&self, id: &BookId) -> RepositoryResult<Option<Book>> {
        Ok(self.books.read().await.get(id).cloned())
    }

    async fn find_all(&self, filters: &[FilterCondition]) -> RepositoryResult<Vec<Book>> {
        let books = self.books.read().await;
        let mut found = Vec::new();
        for book in books.values() {
            if matches_all(book, filters, RepositoryOperation::FindAll)? {
                found.push(book.clone());
            }
        }
        Ok(found)
    }

    async fn count(&self, filters: &[FilterCondition]) -> RepositoryResult<u64> {
        let books = self.books.read().await;
        let mut total = 0_u64;
        for book in books.values() {
            if matches_all(book, filters, RepositoryOperation::Count)? {
                total += 1;
            }
        }
        Ok(total)
    }

    async fn create(&self, data: BookInput) -> RepositoryResult<Book> {
        let book = Book::from_input(self.allocate_id(), data);
        self.books.write().await.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: &BookId, data: BookInput) -> RepositoryResult<Book> {
        let mut books = self.books.write().await;
        let slot = books.get_mut(id).ok_or_else(|| {
            RepositoryError::not_found(ENTITY, id.to_string())
                .with_operation(RepositoryOperation::Update)
        })?;
        *slot = Book::from_input(*id, data);
        Ok(slot.clone())
    }

    async fn delete(&self, id: &BookId) -> RepositoryResult<bool> {
        Ok(self.books.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryErrorKind;

    fn input(title: &str, author: &str, year: i32) -> BookInput {
        BookInput {
            title: title.to_string(),
            author: author.to_string(),
            published_year: year,
            summary: format!("{} by {}", title, author),
        }
    }

    async fn seeded() -> MemoryBookRepository {
        let repo = MemoryBookRepository::new();
        repo.create(input("The Fellowship of the Ring", "J.R.R. Tolkien", 1954))
            .await
            .unwrap();
        repo.create(input("The Two Towers", "tolkien", 1954))
            .await
            .unwrap();
        repo.create(input("The Lion, the Witch and the Wardrobe", "C.S. Lewis", 1950))
            .await
            .unwrap();
        repo.create(input("The Return of the King", "J.R.R. Tolkien", 1955))
            .await
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_never_reused() {
        let repo = MemoryBookRepository::new();
        let first = repo.create(input("A", "X", 2000)).await.unwrap();
        let second = repo.create(input("B", "Y", 2001)).await.unwrap();
        assert_eq!(first.id, BookId::new(1));
        assert_eq!(second.id, BookId::new(2));

        assert!(repo.delete(&second.id).await.unwrap());
        let third = repo.create(input("C", "Z", 2002)).await.unwrap();
        assert_eq!(third.id, BookId::new(3));
    }

    #[tokio::test]
    async fn test_find_all_unfiltered_in_id_order() {
        let repo = seeded().await;
        let books = repo.find_all(&[]).await.unwrap();
        let ids: Vec<i64> = books.iter().map(|b| b.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_author_filter_case_insensitive() {
        let repo = seeded().await;
        let books = repo
            .find_all(&[FilterCondition::icontains("author", "Tolk")])
            .await
            .unwrap();
        assert_eq!(books.len(), 3);
        assert!(books.iter().all(|b| b.author.to_lowercase().contains("tolk")));
    }

    #[tokio::test]
    async fn test_year_and_author_filters_combine() {
        let repo = seeded().await;
        let filters = [
            FilterCondition::icontains("author", "tolkien"),
            FilterCondition::eq("published_year", 1954_i32),
        ];
        let books = repo.find_all(&filters).await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(repo.count(&filters).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_filter_field_is_an_error() {
        let repo = seeded().await;
        let err = repo
            .find_all(&[FilterCondition::eq("isbn", "123")])
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::DatabaseError);
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let repo = seeded().await;
        let updated = repo
            .update(&BookId::new(3), input("Prince Caspian", "C.S. Lewis", 1951))
            .await
            .unwrap();
        assert_eq!(updated.id, BookId::new(3));
        assert_eq!(updated.title, "Prince Caspian");
        assert_eq!(
            repo.find_by_id(&BookId::new(3)).await.unwrap(),
            Some(updated)
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = MemoryBookRepository::new();
        let err = repo
            .update(&BookId::new(99), input("A", "B", 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::NotFound);
        assert_eq!(err.operation, RepositoryOperation::Update);
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let repo = seeded().await;
        assert!(repo.delete(&BookId::new(1)).await.unwrap());
        assert!(!repo.delete(&BookId::new(1)).await.unwrap());
        assert_eq!(repo.find_by_id(&BookId::new(1)).await.unwrap(), None);
        assert_eq!(repo.count(&[]).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let repo = MemoryBookRepository::new();
        let handle = repo.clone();
        handle.create(input("A", "B", 1)).await.unwrap();
        assert_eq!(repo.count(&[]).await.unwrap(), 1);
    }
}
