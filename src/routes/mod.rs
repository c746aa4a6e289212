//! Route modules for Quire Server

pub mod books;
pub mod favourites;
pub mod health;
pub mod readers;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Assemble the API router
///
/// Middleware layers (trace, CORS) are applied by the caller.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/favourite", favourites::router())
        .nest("/reader", readers::router())
        .nest("/book", books::router())
}
