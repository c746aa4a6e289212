//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL)
        .execute(pool)
        .await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Book catalog
CREATE TABLE IF NOT EXISTS books (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT,
    author_name TEXT,
    author_description TEXT,
    -- Category list (JSON array of {name})
    categories TEXT NOT NULL DEFAULT '[]',
    cover TEXT,
    book_url TEXT NOT NULL,
    price REAL NOT NULL DEFAULT 0,
    current_quantity INTEGER NOT NULL DEFAULT 0,
    for_premium INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);

-- Favourites: one row per (user, book)
CREATE TABLE IF NOT EXISTS favourites (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    book_id TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),

    UNIQUE(user_id, book_id)
);

CREATE INDEX IF NOT EXISTS idx_favourites_user_id ON favourites(user_id);
CREATE INDEX IF NOT EXISTS idx_favourites_book_id ON favourites(book_id);

-- Reader state: one row per (user, book), created lazily
CREATE TABLE IF NOT EXISTS readers (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    book_id TEXT NOT NULL,
    -- Current location (JSON object), NULL until first update
    current_location TEXT,
    -- Ordered lists (JSON arrays), replaced wholesale on update
    bookmarks TEXT NOT NULL DEFAULT '[]',
    highlights TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),

    UNIQUE(user_id, book_id)
);

CREATE INDEX IF NOT EXISTS idx_readers_user_id ON readers(user_id);
CREATE INDEX IF NOT EXISTS idx_readers_book_id ON readers(book_id);
"#;
