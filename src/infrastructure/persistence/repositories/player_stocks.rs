use super::decimal_column;
use crate::domain::errors::ServiceResult;
use crate::domain::game::{PlayerStock, PlayerStockView};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

fn map_row(row: &SqliteRow) -> ServiceResult<PlayerStock> {
    Ok(PlayerStock {
        id: row.try_get("id")?,
        player_id: row.try_get("player_id")?,
        stock_id: row.try_get("stock_id")?,
        quantity: row.try_get("quantity")?,
    })
}

pub async fn find(
    conn: &mut SqliteConnection,
    player_id: &str,
    stock_id: i64,
) -> ServiceResult<Option<PlayerStock>> {
    let row = sqlx::query(
        "SELECT id, player_id, stock_id, quantity FROM player_stocks WHERE player_id = ? AND stock_id = ?",
    )
    .bind(player_id)
    .bind(stock_id)
    .fetch_optional(&mut *conn)
    .await?;
    row.as_ref().map(map_row).transpose()
}

/// Holdings of a player joined with stock name and price.
pub async fn find_views_by_player(
    conn: &mut SqliteConnection,
    player_id: &str,
) -> ServiceResult<Vec<PlayerStockView>> {
    let rows = sqlx::query(
        r#"
        SELECT ps.stock_id, s.stock_name, s.stock_price, ps.quantity
        FROM player_stocks ps
        JOIN game_stocks s ON s.id = ps.stock_id
        WHERE ps.player_id = ?
        ORDER BY ps.stock_id
        "#,
    )
    .bind(player_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut views = Vec::with_capacity(rows.len());
    for row in &rows {
        views.push(PlayerStockView {
            stock_id: row.try_get("stock_id")?,
            stock_name: row.try_get("stock_name")?,
            stock_price: decimal_column(row, "stock_price")?,
            quantity: row.try_get("quantity")?,
        });
    }
    Ok(views)
}

pub async fn insert(conn: &mut SqliteConnection, holding: &PlayerStock) -> ServiceResult<i64> {
    let result = sqlx::query("INSERT INTO player_stocks (player_id, stock_id, quantity) VALUES (?, ?, ?)")
        .bind(&holding.player_id)
        .bind(holding.stock_id)
        .bind(holding.quantity)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update_quantity(conn: &mut SqliteConnection, holding: &PlayerStock) -> ServiceResult<()> {
    sqlx::query("UPDATE player_stocks SET quantity = ? WHERE id = ?")
        .bind(holding.quantity)
        .bind(holding.id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> ServiceResult<()> {
    sqlx::query("DELETE FROM player_stocks WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
