//! Book catalog API routes
//!
//! Creation and deletion are admin-only; the catalog itself is
//! readable by any authenticated user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::db::{Book, BookRepository, CreateBook};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Response for the catalog list
#[derive(Serialize)]
pub struct BookListResponse {
    pub books: Vec<Book>,
    pub total: usize,
}

/// Create the books router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/:id", get(get_book).delete(delete_book))
}

/// List the catalog
async fn list_books(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<BookListResponse>> {
    let repo = BookRepository::new(state.db());
    let books = repo.list().await?;
    let total = books.len();

    Ok(Json(BookListResponse { books, total }))
}

/// Get a specific book
async fn get_book(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Book>> {
    let repo = BookRepository::new(state.db());
    let book = repo
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book not found: {id}")))?;
    Ok(Json(book))
}

/// Create a new book (admin only)
async fn create_book(
    State(state): State<AppState>,
    user: AuthUser,
    Json(data): Json<CreateBook>,
) -> Result<(StatusCode, Json<Book>)> {
    user.require_role("admin")?;

    if data.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    if data.book_url.trim().is_empty() {
        return Err(AppError::BadRequest("Book URL is required".to_string()));
    }

    let repo = BookRepository::new(state.db());
    let book = repo.create(&data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Delete a book (admin only)
async fn delete_book(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    user.require_role("admin")?;

    let repo = BookRepository::new(state.db());
    let deleted = repo.delete(&id).await?;

    if deleted {
        Ok(Json(json!({ "message": "Book deleted successfully" })))
    } else {
        Err(AppError::NotFound(format!("Book not found: {id}")))
    }
}
