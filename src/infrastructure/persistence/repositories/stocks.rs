use super::map_unique;
use crate::domain::errors::ServiceResult;
use crate::domain::trading::ListedStock;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

const COLUMNS: &str = "id, code, name, current_price, previous_price, created_at, updated_at";

fn map_row(row: &SqliteRow) -> ServiceResult<ListedStock> {
    Ok(ListedStock {
        id: row.try_get("id")?,
        code: row.try_get("code")?,
        name: row.try_get("name")?,
        current_price: row.try_get("current_price")?,
        previous_price: row.try_get("previous_price")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn find_all(conn: &mut SqliteConnection) -> ServiceResult<Vec<ListedStock>> {
    let rows = sqlx::query(&format!("SELECT {} FROM stocks ORDER BY id", COLUMNS))
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(map_row).collect()
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> ServiceResult<Option<ListedStock>> {
    let row = sqlx::query(&format!("SELECT {} FROM stocks WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(map_row).transpose()
}

pub async fn find_by_code(conn: &mut SqliteConnection, code: &str) -> ServiceResult<Option<ListedStock>> {
    let row = sqlx::query(&format!("SELECT {} FROM stocks WHERE code = ?", COLUMNS))
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(map_row).transpose()
}

pub async fn code_exists(conn: &mut SqliteConnection, code: &str) -> ServiceResult<bool> {
    let row = sqlx::query("SELECT 1 FROM stocks WHERE code = ?")
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

/// True when a position or a transaction still points at the stock.
pub async fn is_referenced(conn: &mut SqliteConnection, id: i64) -> ServiceResult<bool> {
    let row = sqlx::query(
        r#"
        SELECT EXISTS (SELECT 1 FROM portfolios WHERE stock_id = ?1)
            OR EXISTS (SELECT 1 FROM transactions WHERE stock_id = ?1) AS used
        "#,
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    let used: i64 = row.try_get("used")?;
    Ok(used != 0)
}

/// Inserts `stock` (its `id` is ignored) and returns the stored row.
pub async fn insert(conn: &mut SqliteConnection, stock: &ListedStock) -> ServiceResult<ListedStock> {
    let result = sqlx::query(
        r#"
        INSERT INTO stocks (code, name, current_price, previous_price, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&stock.code)
    .bind(&stock.name)
    .bind(stock.current_price)
    .bind(stock.previous_price)
    .bind(stock.created_at)
    .bind(stock.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_unique(e, "Stock code already exists"))?;

    Ok(ListedStock {
        id: result.last_insert_rowid(),
        ..stock.clone()
    })
}

pub async fn update(conn: &mut SqliteConnection, stock: &ListedStock) -> ServiceResult<()> {
    sqlx::query(
        r#"
        UPDATE stocks
        SET code = ?, name = ?, current_price = ?, previous_price = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&stock.code)
    .bind(&stock.name)
    .bind(stock.current_price)
    .bind(stock.previous_price)
    .bind(stock.updated_at)
    .bind(stock.id)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_unique(e, "Stock code already exists"))?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM stocks WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
