//! URL routing
//!
//! | Method                  | Path                   |
//! |-------------------------|------------------------|
//! | GET, POST               | `/books/`              |
//! | GET, PUT, PATCH, DELETE | `/books/{id}/`         |
//! | GET                     | `/books/{id}/summary/` |
//!
//! The same paths without the trailing slash answer with a permanent
//! redirect to the slashed form, keeping method and query string.
//!
//! The book routes are nested under `service.mount_path`; `/health` and
//! `/ready` always sit at the root.

use axum::{
    extract::OriginalUri,
    response::Redirect,
    routing::{any, get},
    Router,
};

use crate::handlers::{
    book_summary, create_book, delete_book, get_book, list_books, partial_update_book,
    update_book,
};
use crate::health::{health, readiness};
use crate::repository::BookRepository;
use crate::state::AppState;

/// Book routes relative to the mount point
pub fn book_routes<R: BookRepository>() -> Router<AppState<R>> {
    Router::new()
        .route("/books/", get(list_books::<R>).post(create_book::<R>))
        .route(
            "/books/{id}/",
            get(get_book::<R>)
                .put(update_book::<R>)
                .patch(partial_update_book::<R>)
                .delete(delete_book::<R>),
        )
        .route("/books/{id}/summary/", get(book_summary::<R>))
        .route("/books", any(append_slash))
        .route("/books/{id}", any(append_slash))
        .route("/books/{id}/summary", any(append_slash))
}

/// 308 to the same path with a trailing slash
async fn append_slash(OriginalUri(uri): OriginalUri) -> Redirect {
    let target = match uri.query() {
        Some(query) => format!("{}/?{}", uri.path(), query),
        None => format!("{}/", uri.path()),
    };
    Redirect::permanent(&target)
}

/// The complete application router, without middleware
pub fn app<R: BookRepository>(state: AppState<R>) -> Router {
    let mount_path = state
        .config()
        .service
        .mount_path
        .trim_end_matches('/')
        .to_string();

    // nest() rejects the root path
    let router = if mount_path.is_empty() {
        Router::new().merge(book_routes::<R>())
    } else {
        Router::new().nest(&mount_path, book_routes::<R>())
    };

    router
        .route("/health", get(health::<R>))
        .route("/ready", get(readiness::<R>))
        .with_state(state)
}
