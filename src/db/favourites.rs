//! Favourites database operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;

/// Favourite record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favourite {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    pub created_at: String,
}

/// Summary of the referenced book, populated on listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteBookSummary {
    pub id: String,
    pub title: String,
    pub book_url: String,
    pub cover: Option<String>,
}

/// Favourite with its book summary attached
///
/// `book` is None when the referenced book has been removed from the
/// catalog since the favourite was created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteWithBook {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<FavouriteBookSummary>,
    pub created_at: String,
}

#[derive(sqlx::FromRow)]
struct FavouriteWithBookRow {
    id: String,
    user_id: String,
    book_id: String,
    created_at: String,
    title: Option<String>,
    book_url: Option<String>,
    cover: Option<String>,
}

impl From<FavouriteWithBookRow> for FavouriteWithBook {
    fn from(row: FavouriteWithBookRow) -> Self {
        let book = match (row.title, row.book_url) {
            (Some(title), Some(book_url)) => Some(FavouriteBookSummary {
                id: row.book_id.clone(),
                title,
                book_url,
                cover: row.cover,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            user_id: row.user_id,
            book_id: row.book_id,
            book,
            created_at: row.created_at,
        }
    }
}

/// Favourite repository
pub struct FavouriteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FavouriteRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a user's favourite for a specific book
    pub async fn find(&self, user_id: &str, book_id: &str) -> Result<Option<Favourite>> {
        let favourite = sqlx::query_as::<_, Favourite>(
            r#"
            SELECT id, user_id, book_id, created_at
            FROM favourites
            WHERE user_id = ? AND book_id = ?
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(favourite)
    }

    /// List a user's favourites with book summaries populated
    pub async fn list_with_books(&self, user_id: &str) -> Result<Vec<FavouriteWithBook>> {
        let rows = sqlx::query_as::<_, FavouriteWithBookRow>(
            r#"
            SELECT f.id, f.user_id, f.book_id, f.created_at,
                   b.title, b.book_url, b.cover
            FROM favourites f
            LEFT JOIN books b ON b.id = f.book_id
            WHERE f.user_id = ?
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(FavouriteWithBook::from).collect())
    }

    /// Create a new favourite
    pub async fn create(&self, user_id: &str, book_id: &str) -> Result<Favourite> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO favourites (id, user_id, book_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(book_id)
        .bind(&now)
        .execute(self.pool)
        .await?;

        Ok(Favourite {
            id,
            user_id: user_id.to_string(),
            book_id: book_id.to_string(),
            created_at: now,
        })
    }

    /// Delete a user's favourite for a book
    pub async fn delete(&self, user_id: &str, book_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favourites WHERE user_id = ? AND book_id = ?")
            .bind(user_id)
            .bind(book_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
