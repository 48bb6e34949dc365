use anyhow::{Context, Result};

use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Transaction;
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

/// Starts a transaction that holds the SQLite write lock from `BEGIN`.
/// Concurrent writers wait on the busy timeout instead of failing on lock upgrade.
pub async fn begin_write(pool: &SqlitePool) -> sqlx::Result<Transaction<'static, Sqlite>> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Shared SQLite pool for all three services.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str, max_connections: u32) -> Result<Self> {
        // Ensure the directory exists if it's a file path
        if let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let in_memory = db_url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        if !in_memory {
            options = options.journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);
        }

        // Every in-memory connection is its own database, so keep exactly one alive.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Connected to database: {}", db_url);

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// Fresh private database, used by tests.
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:", 1).await
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        // 1. Game: players, stocks and holdings
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS players (
                player_id TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                player_money TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS game_stocks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                stock_name TEXT NOT NULL UNIQUE,
                stock_price TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS player_stocks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                player_id TEXT NOT NULL REFERENCES players (player_id) ON DELETE CASCADE,
                stock_id INTEGER NOT NULL REFERENCES game_stocks (id) ON DELETE CASCADE,
                quantity INTEGER NOT NULL CHECK (quantity > 0),
                UNIQUE (player_id, stock_id)
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create game tables")?;

        // 2. Trading: users, listed stocks, positions and the transaction log
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                balance INTEGER NOT NULL CHECK (balance >= 0),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS stocks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                current_price INTEGER NOT NULL CHECK (current_price > 0),
                previous_price INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS portfolios (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                stock_id INTEGER NOT NULL REFERENCES stocks (id),
                quantity INTEGER NOT NULL CHECK (quantity > 0),
                average_price INTEGER NOT NULL,
                UNIQUE (user_id, stock_id)
            );
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                stock_id INTEGER NOT NULL REFERENCES stocks (id),
                type TEXT NOT NULL CHECK (type IN ('BUY', 'SELL')),
                quantity INTEGER NOT NULL,
                price INTEGER NOT NULL,
                total_amount INTEGER NOT NULL,
                transaction_date TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_transactions_user_date
            ON transactions (user_id, transaction_date);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create trading tables")?;

        // 3. Shop: members, products and purchases
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS members (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                phone TEXT,
                address TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                price TEXT NOT NULL,
                stock INTEGER NOT NULL CHECK (stock >= 0),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS purchases (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                member_id INTEGER NOT NULL REFERENCES members (id),
                product_id INTEGER NOT NULL REFERENCES products (id),
                quantity INTEGER NOT NULL CHECK (quantity > 0),
                total_price TEXT NOT NULL,
                purchased_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_purchases_member ON purchases (member_id);
            CREATE INDEX IF NOT EXISTS idx_purchases_product ON purchases (product_id);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create shop tables")?;

        info!("Database schema initialized.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_in_memory_schema_is_created() {
        let db = Database::in_memory().await.unwrap();
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name IN \
             ('players', 'game_stocks', 'player_stocks', 'users', 'stocks', 'portfolios', \
              'transactions', 'members', 'products', 'purchases')",
        )
        .fetch_one(&db.pool)
        .await
        .unwrap();
        let count: i64 = row.try_get("count").unwrap();
        assert_eq!(count, 10);
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.init().await.is_ok());
    }
}
