use super::{decimal_column, map_unique};
use crate::domain::errors::ServiceResult;
use crate::domain::game::GameStock;
use crate::domain::pagination::PageRequest;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

fn map_row(row: &SqliteRow) -> ServiceResult<GameStock> {
    Ok(GameStock {
        id: row.try_get("id")?,
        stock_name: row.try_get("stock_name")?,
        stock_price: decimal_column(row, "stock_price")?,
    })
}

pub async fn count(conn: &mut SqliteConnection) -> ServiceResult<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS total FROM game_stocks")
        .fetch_one(&mut *conn)
        .await?;
    Ok(row.try_get("total")?)
}

pub async fn find_page(conn: &mut SqliteConnection, page: PageRequest) -> ServiceResult<Vec<GameStock>> {
    let rows = sqlx::query("SELECT id, stock_name, stock_price FROM game_stocks ORDER BY id LIMIT ? OFFSET ?")
        .bind(page.count)
        .bind(page.skip())
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(map_row).collect()
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> ServiceResult<Option<GameStock>> {
    let row = sqlx::query("SELECT id, stock_name, stock_price FROM game_stocks WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(map_row).transpose()
}

pub async fn name_taken(conn: &mut SqliteConnection, stock_name: &str, except_id: Option<i64>) -> ServiceResult<bool> {
    let row = sqlx::query("SELECT 1 FROM game_stocks WHERE stock_name = ? AND id != ?")
        .bind(stock_name)
        .bind(except_id.unwrap_or(0))
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

/// Inserts and returns the stock with its new id.
pub async fn insert(conn: &mut SqliteConnection, stock: &GameStock) -> ServiceResult<GameStock> {
    let result = sqlx::query("INSERT INTO game_stocks (stock_name, stock_price) VALUES (?, ?)")
        .bind(&stock.stock_name)
        .bind(stock.stock_price.to_string())
        .execute(&mut *conn)
        .await
        .map_err(|e| map_unique(e, "Stock name already exists"))?;

    Ok(GameStock {
        id: result.last_insert_rowid(),
        ..stock.clone()
    })
}

pub async fn update(conn: &mut SqliteConnection, stock: &GameStock) -> ServiceResult<()> {
    sqlx::query("UPDATE game_stocks SET stock_name = ?, stock_price = ? WHERE id = ?")
        .bind(&stock.stock_name)
        .bind(stock.stock_price.to_string())
        .bind(stock.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_unique(e, "Stock name already exists"))?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM game_stocks WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
