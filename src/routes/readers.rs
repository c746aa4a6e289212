//! Reader state API routes
//!
//! `:id` is the book id; the user comes from the upstream-injected
//! identity, so reader state is always scoped to (user, book).

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::db::{Reader, ReaderRepository};
use crate::error::Result;
use crate::reader::{parse_current_location, ReaderUpdate};
use crate::state::AppState;

/// Create the reader router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_reader))
        .route("/:id", post(update_reader))
}

/// Fetch the reader state for a book, creating it on first access
async fn get_reader(
    State(state): State<AppState>,
    user: AuthUser,
    Path(book_id): Path<String>,
) -> Result<Json<Reader>> {
    let repo = ReaderRepository::new(state.db());
    let reader = repo.get_or_create(&user.id, &book_id).await?;
    Ok(Json(reader))
}

/// Apply a reader state update
///
/// The body carries at most one of currentLocation / bookmarks /
/// highlights; the first present field (in that order) replaces its
/// sub-state. A body with none of the three is a no-op and returns
/// the stored state unchanged.
async fn update_reader(
    State(state): State<AppState>,
    user: AuthUser,
    Path(book_id): Path<String>,
    Json(update): Json<ReaderUpdate>,
) -> Result<Json<Reader>> {
    let repo = ReaderRepository::new(state.db());

    if let Some(ref raw) = update.current_location {
        let location = parse_current_location(raw)?;
        let reader = repo
            .set_current_location(&user.id, &book_id, &location)
            .await?;
        return Ok(Json(reader));
    }

    if let Some(ref bookmarks) = update.bookmarks {
        let reader = repo.set_bookmarks(&user.id, &book_id, bookmarks).await?;
        return Ok(Json(reader));
    }

    if let Some(ref highlights) = update.highlights {
        let reader = repo.set_highlights(&user.id, &book_id, highlights).await?;
        return Ok(Json(reader));
    }

    let reader = repo.get_or_create(&user.id, &book_id).await?;
    Ok(Json(reader))
}
