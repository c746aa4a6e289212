//! Favourites API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;

use crate::auth::AuthUser;
use crate::db::{Favourite, FavouriteRepository, FavouriteWithBook};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the favourites router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favourites))
        .route("/:book_id", post(add_favourite))
        .route("/:book_id", delete(remove_favourite))
}

/// Add a book to the user's favourites
///
/// Duplicate adds are rejected with 400; the pre-check is racy but the
/// UNIQUE constraint keeps the table consistent.
async fn add_favourite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(book_id): Path<String>,
) -> Result<(StatusCode, Json<Favourite>)> {
    if book_id.trim().is_empty() {
        return Err(AppError::BadRequest("Book ID is required".to_string()));
    }

    let repo = FavouriteRepository::new(state.db());

    if repo.find(&user.id, &book_id).await?.is_some() {
        return Err(AppError::BadRequest(
            "Book already in favourites".to_string(),
        ));
    }

    let favourite = repo.create(&user.id, &book_id).await?;
    Ok((StatusCode::CREATED, Json(favourite)))
}

/// List the user's favourites with book summaries populated
async fn list_favourites(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<FavouriteWithBook>>> {
    let repo = FavouriteRepository::new(state.db());
    let favourites = repo.list_with_books(&user.id).await?;
    Ok(Json(favourites))
}

/// Remove a book from the user's favourites
async fn remove_favourite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(book_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let repo = FavouriteRepository::new(state.db());
    let deleted = repo.delete(&user.id, &book_id).await?;

    if deleted {
        Ok(Json(json!({ "message": "Favourite book deleted successfully" })))
    } else {
        Err(AppError::NotFound("Favourite book not found".to_string()))
    }
}
