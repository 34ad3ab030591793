//! PostgreSQL book store

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use super::error::{RepositoryError, RepositoryOperation};
use super::filter::{FilterCondition, FilterOperator, FilterValue};
use super::traits::{Repository, RepositoryResult, BOOK_FILTER_FIELDS};
use crate::books::{Book, BookId, BookInput, ENTITY};

const COLUMNS: &str = "id, title, author, published_year, summary";

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS books (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    published_year INTEGER NOT NULL,
    summary TEXT NOT NULL
)";

/// Book store backed by a `books` table
#[derive(Debug, Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `books` table if it does not exist yet
    ///
    /// Idempotent; this is not a migration system.
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Schema))?;
        tracing::info!("Book table ready");
        Ok(())
    }
}

fn book_from_row(row: &PgRow) -> Result<Book, sqlx::Error> {
    Ok(Book {
        id: BookId::new(row.try_get("id")?),
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        published_year: row.try_get("published_year")?,
        summary: row.try_get("summary")?,
    })
}

/// Escape LIKE metacharacters so the needle matches literally
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append a `WHERE` clause for `filters`
///
/// Field names are checked against [`BOOK_FILTER_FIELDS`] before they are
/// written into the statement; values are always bound.
fn push_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    filters: &[FilterCondition],
    operation: RepositoryOperation,
) -> RepositoryResult<()> {
    for (i, filter) in filters.iter().enumerate() {
        let field = BOOK_FILTER_FIELDS
            .iter()
            .find(|known| **known == filter.field)
            .ok_or_else(|| {
                RepositoryError::database_error(
                    operation,
                    format!("Unknown filter field: {}", filter.field),
                )
            })?;

        query.push(if i == 0 { " WHERE " } else { " AND " });

        match (filter.operator, &filter.value) {
            (FilterOperator::Equal, FilterValue::Integer(n)) => {
                query.push(*field).push(" = ").push_bind(*n);
            }
            (FilterOperator::Equal, FilterValue::String(s)) => {
                query.push(*field).push(" = ").push_bind(s.clone());
            }
            (FilterOperator::ContainsIgnoreCase, value) => {
                let needle = match value {
                    FilterValue::String(s) => escape_like(s),
                    FilterValue::Integer(n) => n.to_string(),
                };
                query
                    .push(*field)
                    .push("::text ILIKE '%' || ")
                    .push_bind(needle)
                    .push(" || '%'");
            }
        }
    }
    Ok(())
}

impl Repository<BookId, Book, BookInput, BookInput> for PgBookRepository {
    async fn find_by_id(&self, id: &BookId) -> RepositoryResult<Option<Book>> {
        let row = sqlx::query(&format!("SELECT {} FROM books WHERE id = $1", COLUMNS))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from(e)
                    .with_operation(RepositoryOperation::FindById)
                    .with_entity(ENTITY, id.to_string())
            })?;

        row.as_ref()
            .map(book_from_row)
            .transpose()
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FindById))
    }

    async fn find_all(&self, filters: &[FilterCondition]) -> RepositoryResult<Vec<Book>> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM books", COLUMNS));
        push_filters(&mut query, filters, RepositoryOperation::FindAll)?;
        query.push(" ORDER BY id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FindAll))?;

        rows.iter()
            .map(book_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FindAll))
    }

    async fn count(&self, filters: &[FilterCondition]) -> RepositoryResult<u64> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");
        push_filters(&mut query, filters, RepositoryOperation::Count)?;

        let total: i64 = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Count))?;

        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn create(&self, data: BookInput) -> RepositoryResult<Book> {
        let row = sqlx::query(&format!(
            "INSERT INTO books (title, author, published_year, summary) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        ))
        .bind(data.title)
        .bind(data.author)
        .bind(data.published_year)
        .bind(data.summary)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Create))?;

        book_from_row(&row)
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Create))
    }

    async fn update(&self, id: &BookId, data: BookInput) -> RepositoryResult<Book> {
        let row = sqlx::query(&format!(
            "UPDATE books SET title = $1, author = $2, published_year = $3, summary = $4 \
             WHERE id = $5 RETURNING {}",
            COLUMNS
        ))
        .bind(data.title)
        .bind(data.author)
        .bind(data.published_year)
        .bind(data.summary)
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from(e)
                .with_operation(RepositoryOperation::Update)
                .with_entity(ENTITY, id.to_string())
        })?;

        let row = row.ok_or_else(|| {
            RepositoryError::not_found(ENTITY, id.to_string())
                .with_operation(RepositoryOperation::Update)
        })?;

        book_from_row(&row)
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Update))
    }

    async fn delete(&self, id: &BookId) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from(e)
                    .with_operation(RepositoryOperation::Delete)
                    .with_entity(ENTITY, id.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }
}
