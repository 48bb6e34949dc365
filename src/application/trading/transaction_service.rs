//! Trade execution and the transaction log.
//!
//! A trade reads the user, the stock and the position, applies the cash and
//! position changes and appends one log row, all inside a single database
//! transaction. Any failure leaves every table untouched.

use crate::domain::clock;
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::trading::{Portfolio, PositionAfterSell, TradeType, Transaction, TransactionView};
use crate::domain::validation::FieldErrors;
use crate::infrastructure::persistence::repositories::{portfolios, stocks, transactions, users};
use crate::infrastructure::persistence::begin_write;
use serde::Deserialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub user_id: Option<i64>,
    pub stock_id: Option<i64>,
    #[serde(rename = "type")]
    pub trade_type: Option<TradeType>,
    pub quantity: Option<i64>,
}

pub struct TransactionService {
    pool: SqlitePool,
}

impl TransactionService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn execute_trade(&self, request: TradeRequest) -> ServiceResult<TransactionView> {
        let mut errors = FieldErrors::new();
        errors
            .required("userId", request.user_id.as_ref(), "user id is required")
            .required("stockId", request.stock_id.as_ref(), "stock id is required")
            .required("type", request.trade_type.as_ref(), "trade type is required")
            .required("quantity", request.quantity.as_ref(), "quantity is required")
            .min_i64("quantity", request.quantity, 1, "quantity must be 1 or greater");
        errors.finish()?;
        let (Some(user_id), Some(stock_id), Some(trade_type), Some(quantity)) =
            (request.user_id, request.stock_id, request.trade_type, request.quantity)
        else {
            return Err(ServiceError::invalid("trade", "incomplete trade request"));
        };

        let mut tx = begin_write(&self.pool).await?;
        let id = match apply_trade(&mut *tx, user_id, stock_id, trade_type, quantity).await {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    "TransactionService: {} of {} x stock {} by user {} rejected: {}",
                    trade_type, quantity, stock_id, user_id, e
                );
                return Err(e);
            }
        };
        let view = transactions::find_view_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::Corrupt(format!("transaction {} vanished", id)))?;
        tx.commit().await?;

        info!(
            "TransactionService: {} {} x {} @ {} for user {} (total {})",
            view.trade_type, view.quantity, view.stock_code, view.price, view.username, view.total_amount
        );
        Ok(view)
    }

    pub async fn user_transactions(&self, user_id: i64) -> ServiceResult<Vec<TransactionView>> {
        let mut conn = self.pool.acquire().await?;
        transactions::views_by_user(&mut *conn, user_id).await
    }

    pub async fn user_stock_transactions(
        &self,
        user_id: i64,
        stock_id: i64,
    ) -> ServiceResult<Vec<TransactionView>> {
        let mut conn = self.pool.acquire().await?;
        transactions::views_by_user_and_stock(&mut *conn, user_id, stock_id).await
    }

    pub async fn get_transaction(&self, id: i64) -> ServiceResult<TransactionView> {
        let mut conn = self.pool.acquire().await?;
        transactions::find_view_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Transaction not found: {}", id)))
    }
}

/// Applies one trade on `conn` and returns the new transaction id.
async fn apply_trade(
    conn: &mut SqliteConnection,
    user_id: i64,
    stock_id: i64,
    trade_type: TradeType,
    quantity: i64,
) -> ServiceResult<i64> {
    let mut user = users::find_by_id(&mut *conn, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("User not found: {}", user_id)))?;
    let stock = stocks::find_by_id(&mut *conn, stock_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Stock not found: {}", stock_id)))?;

    let price = stock.current_price;
    let total_amount = price
        .checked_mul(quantity)
        .ok_or_else(|| ServiceError::invalid("quantity", "trade amount is too large"))?;

    match trade_type {
        TradeType::Buy => {
            user.debit(total_amount)?;
            match portfolios::find(&mut *conn, user_id, stock_id).await? {
                Some(mut position) => {
                    position.apply_buy(quantity, price)?;
                    portfolios::update(&mut *conn, &position).await?;
                }
                None => {
                    let position = Portfolio::open(user_id, stock_id, quantity, price)?;
                    portfolios::insert(&mut *conn, &position).await?;
                }
            }
        }
        TradeType::Sell => {
            let mut position = portfolios::find(&mut *conn, user_id, stock_id)
                .await?
                .ok_or_else(|| ServiceError::InsufficientQuantity("No holding of this stock".to_string()))?;
            match position.apply_sell(quantity)? {
                PositionAfterSell::Closed => portfolios::delete(&mut *conn, position.id).await?,
                PositionAfterSell::Open => portfolios::update(&mut *conn, &position).await?,
            }
            user.credit(total_amount)?;
        }
    }

    let now = clock::now();
    user.updated_at = now;
    users::update(&mut *conn, &user).await?;

    let trade = Transaction {
        id: 0,
        user_id,
        stock_id,
        trade_type,
        quantity,
        price,
        total_amount,
        transaction_date: now,
    };
    transactions::insert(&mut *conn, &trade, now).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::trading::{ListedStockRequest, ListedStockService, UserRequest, UserService};
    use crate::domain::errors::ErrorCode;
    use crate::infrastructure::persistence::Database;

    struct Fixture {
        trades: TransactionService,
        users: UserService,
        user_id: i64,
        stock_id: i64,
    }

    async fn fixture(balance: i64, price: i64) -> Fixture {
        fixture_on(Database::in_memory().await.unwrap(), balance, price).await
    }

    async fn fixture_on(db: Database, balance: i64, price: i64) -> Fixture {
        let users = UserService::new(db.pool.clone());
        let stocks = ListedStockService::new(db.pool.clone());
        let user = users
            .create_user(UserRequest {
                username: Some("kim".into()),
                balance: Some(balance),
            })
            .await
            .unwrap();
        let stock = stocks
            .create_stock(ListedStockRequest {
                code: Some("005930".into()),
                name: Some("Samsung".into()),
                current_price: Some(price),
                previous_price: None,
            })
            .await
            .unwrap();
        Fixture {
            trades: TransactionService::new(db.pool),
            users,
            user_id: user.id,
            stock_id: stock.id,
        }
    }

    fn trade(f: &Fixture, trade_type: TradeType, quantity: i64) -> TradeRequest {
        TradeRequest {
            user_id: Some(f.user_id),
            stock_id: Some(f.stock_id),
            trade_type: Some(trade_type),
            quantity: Some(quantity),
        }
    }

    #[tokio::test]
    async fn test_buy_debits_and_logs() {
        let f = fixture(1_000_000, 70_000).await;
        let view = f.trades.execute_trade(trade(&f, TradeType::Buy, 10)).await.unwrap();

        assert_eq!(view.total_amount, 700_000);
        assert_eq!(view.username, "kim");
        assert_eq!(view.stock_code, "005930");
        assert_eq!(f.users.get_user(f.user_id).await.unwrap().balance, 300_000);
    }

    #[tokio::test]
    async fn test_buy_beyond_balance_changes_nothing() {
        let f = fixture(100, 70_000).await;
        let err = f.trades.execute_trade(trade(&f, TradeType::Buy, 1)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientFunds);
        assert_eq!(f.users.get_user(f.user_id).await.unwrap().balance, 100);
        assert!(f.trades.user_transactions(f.user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sell_without_position() {
        let f = fixture(1_000, 10).await;
        let err = f.trades.execute_trade(trade(&f, TradeType::Sell, 1)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientQuantity);
    }

    #[tokio::test]
    async fn test_sell_all_credits_and_closes_position() {
        let f = fixture(1_000, 10).await;
        f.trades.execute_trade(trade(&f, TradeType::Buy, 5)).await.unwrap();

        let err = f.trades.execute_trade(trade(&f, TradeType::Sell, 6)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientQuantity);

        f.trades.execute_trade(trade(&f, TradeType::Sell, 5)).await.unwrap();
        assert_eq!(f.users.get_user(f.user_id).await.unwrap().balance, 1_000);

        let history = f.trades.user_stock_transactions(f.user_id, f.stock_id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].trade_type, TradeType::Sell);

        let err = f.trades.get_transaction(9999).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataNotFound);
    }

    #[tokio::test]
    async fn test_missing_fields_are_reported_together() {
        let f = fixture(1_000, 10).await;
        let err = f.trades.execute_trade(TradeRequest::default()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "userId: user id is required, stockId: stock id is required, \
             type: trade type is required, quantity: quantity is required"
        );
    }

    #[tokio::test]
    async fn test_concurrent_trades_on_file_database_all_commit() {
        let path = std::env::temp_dir().join(format!("stockdesk-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}", path.display());
        let db = Database::new(&url, 4).await.unwrap();
        let pool = db.pool.clone();
        let f = std::sync::Arc::new(fixture_on(db, 1_000_000, 100).await);

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let f = f.clone();
            tasks.spawn(async move { f.trades.execute_trade(trade(&f, TradeType::Buy, 10)).await });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap().unwrap();
        }

        assert_eq!(f.users.get_user(f.user_id).await.unwrap().balance, 1_000_000 - 8 * 1_000);
        assert_eq!(f.trades.user_transactions(f.user_id).await.unwrap().len(), 8);

        pool.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
