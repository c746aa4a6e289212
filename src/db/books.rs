//! Book catalog database operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;

/// A named category tag on a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

/// Book record as served to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_description: Option<String>,
    pub category: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub book_url: String,
    pub price: f64,
    pub current_quantity: i64,
    pub for_premium: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Create book request, field names as the admin form sends them
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_description: Option<String>,
    #[serde(default)]
    pub category: Vec<Category>,
    #[serde(default)]
    pub cover: Option<String>,
    pub book_url: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub current_quantity: i64,
    #[serde(default)]
    pub for_premium: bool,
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: String,
    title: String,
    description: Option<String>,
    status: Option<String>,
    author_name: Option<String>,
    author_description: Option<String>,
    categories: String,
    cover: Option<String>,
    book_url: String,
    price: f64,
    current_quantity: i64,
    for_premium: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<BookRow> for Book {
    type Error = crate::error::AppError;

    fn try_from(row: BookRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            author_name: row.author_name,
            author_description: row.author_description,
            category: serde_json::from_str(&row.categories)?,
            cover: row.cover,
            book_url: row.book_url,
            price: row.price,
            current_quantity: row.current_quantity,
            for_premium: row.for_premium,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const BOOK_COLUMNS: &str = "id, title, description, status, author_name, author_description, \
                            categories, cover, book_url, price, current_quantity, for_premium, \
                            created_at, updated_at";

/// Book repository
pub struct BookRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a specific book
    pub async fn get(&self, id: &str) -> Result<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Book::try_from).transpose()
    }

    /// List the catalog, newest first
    pub async fn list(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Book::try_from).collect()
    }

    /// Create a new book
    pub async fn create(&self, data: &CreateBook) -> Result<Book> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let categories = serde_json::to_string(&data.category)?;

        sqlx::query(
            r#"
            INSERT INTO books (id, title, description, status, author_name, author_description,
                               categories, cover, book_url, price, current_quantity, for_premium,
                               created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.status)
        .bind(&data.author_name)
        .bind(&data.author_description)
        .bind(&categories)
        .bind(&data.cover)
        .bind(&data.book_url)
        .bind(data.price)
        .bind(data.current_quantity)
        .bind(data.for_premium)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await?;

        self.get(&id).await?.ok_or_else(|| {
            crate::error::AppError::Internal("Failed to fetch created book".to_string())
        })
    }

    /// Delete a book
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
