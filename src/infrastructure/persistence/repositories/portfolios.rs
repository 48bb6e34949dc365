use crate::domain::errors::ServiceResult;
use crate::domain::trading::Portfolio;
use crate::domain::trading::analysis::PositionValuation;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

const VALUATION_SELECT: &str = r#"
    SELECT p.id AS portfolio_id, p.user_id, u.username, p.stock_id,
           s.code AS stock_code, s.name AS stock_name,
           p.quantity, p.average_price, s.current_price
    FROM portfolios p
    JOIN users u ON u.id = p.user_id
    JOIN stocks s ON s.id = p.stock_id
"#;

fn map_row(row: &SqliteRow) -> ServiceResult<Portfolio> {
    Ok(Portfolio {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        stock_id: row.try_get("stock_id")?,
        quantity: row.try_get("quantity")?,
        average_price: row.try_get("average_price")?,
    })
}

fn map_valuation(row: &SqliteRow) -> ServiceResult<PositionValuation> {
    Ok(PositionValuation {
        portfolio_id: row.try_get("portfolio_id")?,
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        stock_id: row.try_get("stock_id")?,
        stock_code: row.try_get("stock_code")?,
        stock_name: row.try_get("stock_name")?,
        quantity: row.try_get("quantity")?,
        average_price: row.try_get("average_price")?,
        current_price: row.try_get("current_price")?,
    })
}

pub async fn find(
    conn: &mut SqliteConnection,
    user_id: i64,
    stock_id: i64,
) -> ServiceResult<Option<Portfolio>> {
    let row = sqlx::query(
        "SELECT id, user_id, stock_id, quantity, average_price FROM portfolios WHERE user_id = ? AND stock_id = ?",
    )
    .bind(user_id)
    .bind(stock_id)
    .fetch_optional(&mut *conn)
    .await?;
    row.as_ref().map(map_row).transpose()
}

pub async fn insert(conn: &mut SqliteConnection, position: &Portfolio) -> ServiceResult<i64> {
    let result = sqlx::query(
        "INSERT INTO portfolios (user_id, stock_id, quantity, average_price) VALUES (?, ?, ?, ?)",
    )
    .bind(position.user_id)
    .bind(position.stock_id)
    .bind(position.quantity)
    .bind(position.average_price)
    .execute(&mut *conn)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update(conn: &mut SqliteConnection, position: &Portfolio) -> ServiceResult<()> {
    sqlx::query("UPDATE portfolios SET quantity = ?, average_price = ? WHERE id = ?")
        .bind(position.quantity)
        .bind(position.average_price)
        .bind(position.id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> ServiceResult<()> {
    sqlx::query("DELETE FROM portfolios WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Every position of the user joined with its stock's current price.
pub async fn valuations_by_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> ServiceResult<Vec<PositionValuation>> {
    let sql = format!("{} WHERE p.user_id = ? ORDER BY p.stock_id", VALUATION_SELECT);
    let rows = sqlx::query(&sql).bind(user_id).fetch_all(&mut *conn).await?;
    rows.iter().map(map_valuation).collect()
}

pub async fn valuation(
    conn: &mut SqliteConnection,
    user_id: i64,
    stock_id: i64,
) -> ServiceResult<Option<PositionValuation>> {
    let sql = format!("{} WHERE p.user_id = ? AND p.stock_id = ?", VALUATION_SELECT);
    let row = sqlx::query(&sql)
        .bind(user_id)
        .bind(stock_id)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(map_valuation).transpose()
}
