use super::map_unique;
use crate::domain::errors::ServiceResult;
use crate::domain::trading::User;
use chrono::NaiveDateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

const COLUMNS: &str = "id, username, balance, created_at, updated_at";

fn map_row(row: &SqliteRow) -> ServiceResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        balance: row.try_get("balance")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn find_all(conn: &mut SqliteConnection) -> ServiceResult<Vec<User>> {
    let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY id", COLUMNS))
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(map_row).collect()
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> ServiceResult<Option<User>> {
    let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(map_row).transpose()
}

/// Whether another user already owns `username`.
pub async fn username_taken(
    conn: &mut SqliteConnection,
    username: &str,
    except_id: Option<i64>,
) -> ServiceResult<bool> {
    let row = sqlx::query("SELECT 1 FROM users WHERE username = ? AND id != ?")
        .bind(username)
        .bind(except_id.unwrap_or(0))
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

pub async fn insert(
    conn: &mut SqliteConnection,
    username: &str,
    balance: i64,
    now: NaiveDateTime,
) -> ServiceResult<User> {
    let result = sqlx::query(
        "INSERT INTO users (username, balance, created_at, updated_at) VALUES (?, ?, ?, ?)",
    )
    .bind(username)
    .bind(balance)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_unique(e, "Username already exists"))?;

    Ok(User {
        id: result.last_insert_rowid(),
        username: username.to_string(),
        balance,
        created_at: now,
        updated_at: now,
    })
}

pub async fn update(conn: &mut SqliteConnection, user: &User) -> ServiceResult<()> {
    sqlx::query("UPDATE users SET username = ?, balance = ?, updated_at = ? WHERE id = ?")
        .bind(&user.username)
        .bind(user.balance)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_unique(e, "Username already exists"))?;
    Ok(())
}

/// Portfolios and transactions go with the user through the cascade.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
