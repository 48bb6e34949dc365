//! SQLite repositories.
//!
//! Each module is a set of free functions over `&mut SqliteConnection` so a
//! service can run several of them inside one `begin_write` transaction.
//! Decimals are stored as TEXT and timestamps as `YYYY-MM-DD HH:MM:SS`.

pub mod game_stocks;
pub mod members;
pub mod player_stocks;
pub mod players;
pub mod portfolios;
pub mod products;
pub mod purchases;
pub mod stocks;
pub mod transactions;
pub mod users;

use crate::domain::errors::{ServiceError, ServiceResult};
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::str::FromStr;

pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> ServiceResult<Decimal> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw)
        .map_err(|e| ServiceError::Corrupt(format!("{} '{}': {}", column, raw, e)))
}

/// Turns a UNIQUE constraint failure into `Duplicated`, anything else stays a database error.
pub(crate) fn map_unique(err: sqlx::Error, message: &str) -> ServiceError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => ServiceError::Duplicated(message.to_string()),
        _ => ServiceError::Database(err),
    }
}
