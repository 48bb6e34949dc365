use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::trading::analysis::{DailyTransaction, TradeStatistics};
use crate::domain::trading::{TradeType, Transaction, TransactionView};
use chrono::{Days, NaiveDate, NaiveDateTime};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::str::FromStr;

const VIEW_SELECT: &str = r#"
    SELECT t.id, t.user_id, u.username, t.stock_id, s.code AS stock_code, s.name AS stock_name,
           t.type, t.quantity, t.price, t.total_amount, t.transaction_date, t.created_at
    FROM transactions t
    JOIN users u ON u.id = t.user_id
    JOIN stocks s ON s.id = t.stock_id
"#;

fn map_view(row: &SqliteRow) -> ServiceResult<TransactionView> {
    let raw_type: String = row.try_get("type")?;
    let trade_type = TradeType::from_str(&raw_type).map_err(ServiceError::Corrupt)?;

    Ok(TransactionView {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        stock_id: row.try_get("stock_id")?,
        stock_code: row.try_get("stock_code")?,
        stock_name: row.try_get("stock_name")?,
        trade_type,
        quantity: row.try_get("quantity")?,
        price: row.try_get("price")?,
        total_amount: row.try_get("total_amount")?,
        transaction_date: row.try_get("transaction_date")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Appends a trade to the log. Rows are never updated afterwards.
pub async fn insert(
    conn: &mut SqliteConnection,
    trade: &Transaction,
    created_at: NaiveDateTime,
) -> ServiceResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO transactions
        (user_id, stock_id, type, quantity, price, total_amount, transaction_date, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(trade.user_id)
    .bind(trade.stock_id)
    .bind(trade.trade_type.to_string())
    .bind(trade.quantity)
    .bind(trade.price)
    .bind(trade.total_amount)
    .bind(trade.transaction_date)
    .bind(created_at)
    .execute(&mut *conn)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_view_by_id(conn: &mut SqliteConnection, id: i64) -> ServiceResult<Option<TransactionView>> {
    let sql = format!("{} WHERE t.id = ?", VIEW_SELECT);
    let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *conn).await?;
    row.as_ref().map(map_view).transpose()
}

/// Newest first.
pub async fn views_by_user(conn: &mut SqliteConnection, user_id: i64) -> ServiceResult<Vec<TransactionView>> {
    let sql = format!(
        "{} WHERE t.user_id = ? ORDER BY t.transaction_date DESC, t.id DESC",
        VIEW_SELECT
    );
    let rows = sqlx::query(&sql).bind(user_id).fetch_all(&mut *conn).await?;
    rows.iter().map(map_view).collect()
}

pub async fn views_by_user_and_stock(
    conn: &mut SqliteConnection,
    user_id: i64,
    stock_id: i64,
) -> ServiceResult<Vec<TransactionView>> {
    let sql = format!(
        "{} WHERE t.user_id = ? AND t.stock_id = ? ORDER BY t.transaction_date DESC, t.id DESC",
        VIEW_SELECT
    );
    let rows = sqlx::query(&sql)
        .bind(user_id)
        .bind(stock_id)
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(map_view).collect()
}

pub async fn statistics(conn: &mut SqliteConnection, user_id: i64) -> ServiceResult<TradeStatistics> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS total_trade_count,
               COALESCE(SUM(CASE WHEN type = 'BUY' THEN 1 ELSE 0 END), 0) AS buy_count,
               COALESCE(SUM(CASE WHEN type = 'SELL' THEN 1 ELSE 0 END), 0) AS sell_count,
               COALESCE(SUM(CASE WHEN type = 'BUY' THEN total_amount ELSE 0 END), 0) AS total_buy_amount,
               COALESCE(SUM(CASE WHEN type = 'SELL' THEN total_amount ELSE 0 END), 0) AS total_sell_amount,
               COALESCE(SUM(CASE WHEN type = 'BUY' THEN quantity ELSE 0 END), 0) AS total_buy_quantity,
               COALESCE(SUM(CASE WHEN type = 'SELL' THEN quantity ELSE 0 END), 0) AS total_sell_quantity
        FROM transactions
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(TradeStatistics {
        user_id,
        total_trade_count: row.try_get("total_trade_count")?,
        buy_count: row.try_get("buy_count")?,
        sell_count: row.try_get("sell_count")?,
        total_buy_amount: row.try_get("total_buy_amount")?,
        total_sell_amount: row.try_get("total_sell_amount")?,
        total_buy_quantity: row.try_get("total_buy_quantity")?,
        total_sell_quantity: row.try_get("total_sell_quantity")?,
    })
}

/// Per-day aggregates for `[start 00:00:00, end 23:59:59]`, newest day first.
pub async fn daily(
    conn: &mut SqliteConnection,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> ServiceResult<Vec<DailyTransaction>> {
    let from = format!("{} 00:00:00", start.format("%Y-%m-%d"));
    // Half-open upper bound so the whole last second of `end` is included.
    let until = match end.checked_add_days(Days::new(1)) {
        Some(next) => format!("{} 00:00:00", next.format("%Y-%m-%d")),
        None => format!("{} 23:59:59.999", end.format("%Y-%m-%d")),
    };

    let rows = sqlx::query(
        r#"
        SELECT date(transaction_date) AS trade_date,
               COUNT(*) AS trade_count,
               COALESCE(SUM(total_amount), 0) AS total_amount,
               COALESCE(SUM(CASE WHEN type = 'BUY' THEN 1 ELSE 0 END), 0) AS buy_count,
               COALESCE(SUM(CASE WHEN type = 'SELL' THEN 1 ELSE 0 END), 0) AS sell_count,
               COALESCE(SUM(CASE WHEN type = 'BUY' THEN total_amount ELSE 0 END), 0) AS buy_amount,
               COALESCE(SUM(CASE WHEN type = 'SELL' THEN total_amount ELSE 0 END), 0) AS sell_amount
        FROM transactions
        WHERE user_id = ? AND transaction_date >= ? AND transaction_date < ?
        GROUP BY date(transaction_date)
        ORDER BY trade_date DESC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(until)
    .fetch_all(&mut *conn)
    .await?;

    let mut days = Vec::with_capacity(rows.len());
    for row in &rows {
        let raw_date: String = row.try_get("trade_date")?;
        let trade_date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
            .map_err(|e| ServiceError::Corrupt(format!("trade_date '{}': {}", raw_date, e)))?;
        days.push(DailyTransaction {
            trade_date,
            trade_count: row.try_get("trade_count")?,
            total_amount: row.try_get("total_amount")?,
            buy_count: row.try_get("buy_count")?,
            sell_count: row.try_get("sell_count")?,
            buy_amount: row.try_get("buy_amount")?,
            sell_amount: row.try_get("sell_amount")?,
        });
    }
    Ok(days)
}
