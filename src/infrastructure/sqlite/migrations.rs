use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS securities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ticker TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL DEFAULT '',
            sector TEXT NOT NULL DEFAULT '',
            industry TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            website TEXT NOT NULL DEFAULT '',
            country TEXT NOT NULL DEFAULT '',
            employees INTEGER NOT NULL DEFAULT 0,
            logo TEXT NOT NULL DEFAULT '',
            ipo_date TEXT NOT NULL DEFAULT '',
            ceo TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS daily_rankings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            security_id INTEGER NOT NULL REFERENCES securities(id),
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            rank INTEGER NOT NULL,
            change_amount REAL NOT NULL DEFAULT 0,
            change_rate REAL NOT NULL DEFAULT 0,
            price REAL NOT NULL DEFAULT 0,
            news_summary TEXT NOT NULL DEFAULT '',
            ai_analysis TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (security_id, date, category)
        );

        CREATE TABLE IF NOT EXISTS security_metrics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            security_id INTEGER NOT NULL REFERENCES securities(id),
            date TEXT NOT NULL,
            market_cap REAL NOT NULL DEFAULT 0,
            volume INTEGER NOT NULL DEFAULT 0,
            average_volume INTEGER NOT NULL DEFAULT 0,
            beta REAL NOT NULL DEFAULT 0,
            last_dividend REAL NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL,
            UNIQUE (security_id, date)
        );

        CREATE TABLE IF NOT EXISTS news_searches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject TEXT NOT NULL,
            searched_at TEXT NOT NULL,
            combined_content TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS news_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            news_search_id INTEGER NOT NULL REFERENCES news_searches(id) ON DELETE CASCADE,
            query TEXT NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            url TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL DEFAULT '',
            score REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_rankings_date_cat ON daily_rankings(date, category, rank);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_rankings_held_rank
            ON daily_rankings(date, category, rank) WHERE rank >= 1;
        CREATE INDEX IF NOT EXISTS idx_news_subject ON news_searches(subject, searched_at);
        CREATE INDEX IF NOT EXISTS idx_news_items_search ON news_items(news_search_id);
        ",
    )
    .map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
