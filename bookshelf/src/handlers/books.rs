//! HTTP handlers for the Book resource
//!
//! One function per verb. Every handler is generic over the store so the
//! same code serves PostgreSQL in production and the in-memory store in
//! tests.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::error::{ApiError, ApiOperation};
use super::query::BookListQuery;
use crate::books::{Book, BookId, BookSerializer, BookSummary, ENTITY};
use crate::repository::BookRepository;
use crate::state::AppState;

/// Path segments that are not digits address no book
fn parse_id(raw: &str, operation: ApiOperation) -> Result<BookId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(ENTITY, raw).with_operation(operation))
}

async fn load<R: BookRepository>(
    books: &R,
    id: BookId,
    operation: ApiOperation,
) -> Result<Book, ApiError> {
    books
        .find_by_id(&id)
        .await
        .map_err(|e| ApiError::from(e).with_operation(operation))?
        .ok_or_else(|| ApiError::not_found(ENTITY, id.to_string()).with_operation(operation))
}

/// `GET /books/`
pub async fn list_books<R: BookRepository>(
    State(state): State<AppState<R>>,
    Query(query): Query<BookListQuery>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let filters = query.filters()?;
    let books = state
        .books()
        .find_all(&filters)
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::List))?;

    tracing::debug!(
        filters = ?filters.iter().map(ToString::to_string).collect::<Vec<_>>(),
        count = books.len(),
        "Listed books"
    );
    Ok(Json(books))
}

/// `POST /books/`
pub async fn create_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let input = BookSerializer::validate(&body)?;
    let book = state
        .books()
        .create(input)
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Create))?;

    tracing::info!(book_id = %book.id, title = %book.title, "Book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// `GET /books/{id}/`
pub async fn get_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&raw_id, ApiOperation::Get)?;
    let book = load(state.books(), id, ApiOperation::Get).await?;
    Ok(Json(book))
}

/// `PUT /books/{id}/`
///
/// The book must exist before the body is looked at, so an unknown id is a
/// 404 even when the body is also invalid.
pub async fn update_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&raw_id, ApiOperation::Update)?;
    load(state.books(), id, ApiOperation::Update).await?;

    let input = BookSerializer::validate(&body)
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Update))?;
    let book = state
        .books()
        .update(&id, input)
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Update))?;

    tracing::info!(book_id = %book.id, "Book replaced");
    Ok(Json(book))
}

/// `PATCH /books/{id}/`
pub async fn partial_update_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&raw_id, ApiOperation::PartialUpdate)?;
    let current = load(state.books(), id, ApiOperation::PartialUpdate).await?;

    let patch = BookSerializer::validate_partial(&body)
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::PartialUpdate))?;
    let book = state
        .books()
        .update(&id, patch.apply_to(&current))
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::PartialUpdate))?;

    tracing::info!(book_id = %book.id, "Book updated");
    Ok(Json(book))
}

/// `DELETE /books/{id}/`
pub async fn delete_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id, ApiOperation::Delete)?;
    let deleted = state
        .books()
        .delete(&id)
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Delete))?;

    if !deleted {
        return Err(ApiError::not_found(ENTITY, id.to_string()).with_operation(ApiOperation::Delete));
    }

    tracing::info!(book_id = %id, "Book deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /books/{id}/summary/`
pub async fn book_summary<R: BookRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> Result<Json<BookSummary>, ApiError> {
    let id = parse_id(&raw_id, ApiOperation::Summary)?;
    let book = load(state.books(), id, ApiOperation::Summary).await?;
    Ok(Json(book.to_summary()))
}
