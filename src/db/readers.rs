//! Reader state database operations
//!
//! One row per (user, book). The location object and both lists are
//! stored as JSON text, matching the schemaless shape the client
//! sends. Updates replace a single sub-state, last write wins.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::reader::{Bookmark, CurrentLocation, Highlight};

/// Reader state record as served to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reader {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<CurrentLocation>,
    pub bookmarks: Vec<Bookmark>,
    pub highlights: Vec<Highlight>,
    pub created_at: String,
    pub updated_at: String,
}

/// Raw row with JSON text columns still encoded
#[derive(sqlx::FromRow)]
struct ReaderRow {
    id: String,
    user_id: String,
    book_id: String,
    current_location: Option<String>,
    bookmarks: String,
    highlights: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ReaderRow> for Reader {
    type Error = crate::error::AppError;

    fn try_from(row: ReaderRow) -> Result<Self> {
        let current_location = row
            .current_location
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            book_id: row.book_id,
            current_location,
            bookmarks: serde_json::from_str(&row.bookmarks)?,
            highlights: serde_json::from_str(&row.highlights)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Reader state repository
pub struct ReaderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReaderRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    async fn find(&self, user_id: &str, book_id: &str) -> Result<Option<Reader>> {
        let row = sqlx::query_as::<_, ReaderRow>(
            r#"
            SELECT id, user_id, book_id, current_location, bookmarks, highlights,
                   created_at, updated_at
            FROM readers
            WHERE user_id = ? AND book_id = ?
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Reader::try_from).transpose()
    }

    /// Fetch the reader state, creating an empty one on first access
    pub async fn get_or_create(&self, user_id: &str, book_id: &str) -> Result<Reader> {
        if let Some(reader) = self.find(user_id, book_id).await? {
            return Ok(reader);
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO readers (id, user_id, book_id, bookmarks, highlights, created_at, updated_at)
            VALUES (?, ?, ?, '[]', '[]', ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(book_id)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await?;

        Ok(Reader {
            id,
            user_id: user_id.to_string(),
            book_id: book_id.to_string(),
            current_location: None,
            bookmarks: Vec::new(),
            highlights: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Replace the current location
    pub async fn set_current_location(
        &self,
        user_id: &str,
        book_id: &str,
        location: &CurrentLocation,
    ) -> Result<Reader> {
        self.get_or_create(user_id, book_id).await?;

        let json = serde_json::to_string(location)?;
        self.update_column(user_id, book_id, "current_location", &json)
            .await
    }

    /// Replace the bookmark list
    pub async fn set_bookmarks(
        &self,
        user_id: &str,
        book_id: &str,
        bookmarks: &[Bookmark],
    ) -> Result<Reader> {
        self.get_or_create(user_id, book_id).await?;

        let json = serde_json::to_string(bookmarks)?;
        self.update_column(user_id, book_id, "bookmarks", &json)
            .await
    }

    /// Replace the highlight list
    pub async fn set_highlights(
        &self,
        user_id: &str,
        book_id: &str,
        highlights: &[Highlight],
    ) -> Result<Reader> {
        self.get_or_create(user_id, book_id).await?;

        let json = serde_json::to_string(highlights)?;
        self.update_column(user_id, book_id, "highlights", &json)
            .await
    }

    async fn update_column(
        &self,
        user_id: &str,
        book_id: &str,
        column: &str,
        json: &str,
    ) -> Result<Reader> {
        let now = Utc::now().to_rfc3339();

        // `column` is one of three fixed names, never user input
        let query = format!(
            "UPDATE readers SET {column} = ?, updated_at = ? WHERE user_id = ? AND book_id = ?"
        );

        sqlx::query(&query)
            .bind(json)
            .bind(&now)
            .bind(user_id)
            .bind(book_id)
            .execute(self.pool)
            .await?;

        self.find(user_id, book_id).await?.ok_or_else(|| {
            crate::error::AppError::Internal("Failed to fetch updated reader".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> (SqlitePool, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("test.db").display());
        let pool = crate::db::create_pool(&url).await.unwrap();
        (pool, dir)
    }

    fn location(page: i64) -> CurrentLocation {
        CurrentLocation {
            chapter_name: None,
            current_page: page,
            total_page: 100,
            start_cfi: format!("epubcfi(/6/4!/4/{page}/1:0)"),
            end_cfi: format!("epubcfi(/6/4!/4/{page}/1:50)"),
            base: "/6/4".to_string(),
        }
    }

    #[tokio::test]
    async fn first_access_creates_empty_state() {
        let (pool, _dir) = test_pool().await;
        let repo = ReaderRepository::new(&pool);

        let reader = repo.get_or_create("u1", "b1").await.unwrap();
        assert!(reader.current_location.is_none());
        assert!(reader.bookmarks.is_empty());
        assert!(reader.highlights.is_empty());

        // Second access returns the same row
        let again = repo.get_or_create("u1", "b1").await.unwrap();
        assert_eq!(again.id, reader.id);
    }

    #[tokio::test]
    async fn location_update_is_last_write_wins() {
        let (pool, _dir) = test_pool().await;
        let repo = ReaderRepository::new(&pool);

        repo.set_current_location("u1", "b1", &location(10))
            .await
            .unwrap();
        let reader = repo
            .set_current_location("u1", "b1", &location(42))
            .await
            .unwrap();

        assert_eq!(reader.current_location.unwrap().current_page, 42);
    }

    #[tokio::test]
    async fn bookmark_list_is_replaced_wholesale() {
        let (pool, _dir) = test_pool().await;
        let repo = ReaderRepository::new(&pool);

        let first = vec![
            Bookmark {
                key: None,
                start_cfi: "epubcfi(/6/4!/4/2/1:0)".to_string(),
                end_cfi: None,
                chapter_name: None,
                current_page: Some(1),
                total_page: None,
                base: None,
            },
            Bookmark {
                key: None,
                start_cfi: "epubcfi(/6/6!/4/2/1:0)".to_string(),
                end_cfi: None,
                chapter_name: None,
                current_page: Some(9),
                total_page: None,
                base: None,
            },
        ];
        repo.set_bookmarks("u1", "b1", &first).await.unwrap();

        let reader = repo.set_bookmarks("u1", "b1", &first[1..]).await.unwrap();
        assert_eq!(reader.bookmarks.len(), 1);
        assert_eq!(reader.bookmarks[0].start_cfi, "epubcfi(/6/6!/4/2/1:0)");
    }

    #[tokio::test]
    async fn state_is_scoped_per_user_and_book() {
        let (pool, _dir) = test_pool().await;
        let repo = ReaderRepository::new(&pool);

        repo.set_current_location("u1", "b1", &location(10))
            .await
            .unwrap();

        let other_user = repo.get_or_create("u2", "b1").await.unwrap();
        assert!(other_user.current_location.is_none());

        let other_book = repo.get_or_create("u1", "b2").await.unwrap();
        assert!(other_book.current_location.is_none());
    }
}
