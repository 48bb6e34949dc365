use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::trading::TransactionView;
use crate::domain::trading::analysis::{
    DailyTransaction, PortfolioProfitLoss, PositionDetail, TotalAsset, TradeStatistics,
    profit_loss_rate, totals,
};
use crate::infrastructure::persistence::repositories::{portfolios, transactions, users};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

/// Read-only portfolio and trade analysis.
pub struct AnalysisService {
    pool: SqlitePool,
}

impl AnalysisService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every position of the user valued at the current price.
    pub async fn user_portfolio(&self, user_id: i64) -> ServiceResult<Vec<PositionDetail>> {
        let mut conn = self.pool.acquire().await?;
        let positions = portfolios::valuations_by_user(&mut *conn, user_id).await?;
        positions.iter().map(PositionDetail::try_from).collect()
    }

    pub async fn portfolio_profit_loss(&self, user_id: i64) -> ServiceResult<Vec<PortfolioProfitLoss>> {
        let mut conn = self.pool.acquire().await?;
        let positions = portfolios::valuations_by_user(&mut *conn, user_id).await?;
        positions.iter().map(PortfolioProfitLoss::try_from).collect()
    }

    pub async fn detailed_transactions(&self, user_id: i64) -> ServiceResult<Vec<TransactionView>> {
        let mut conn = self.pool.acquire().await?;
        transactions::views_by_user(&mut *conn, user_id).await
    }

    pub async fn stock_position(&self, user_id: i64, stock_id: i64) -> ServiceResult<PositionDetail> {
        let mut conn = self.pool.acquire().await?;
        let position = portfolios::valuation(&mut *conn, user_id, stock_id)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(format!(
                    "Portfolio not found. userId: {}, stockId: {}",
                    user_id, stock_id
                ))
            })?;
        PositionDetail::try_from(&position)
    }

    pub async fn total_asset(&self, user_id: i64) -> ServiceResult<TotalAsset> {
        let mut conn = self.pool.acquire().await?;
        let user = users::find_by_id(&mut *conn, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("User not found: {}", user_id)))?;
        let positions = portfolios::valuations_by_user(&mut *conn, user_id).await?;
        let (investment, stock_value) = totals(&positions)?;

        TotalAsset::compute(
            user.id,
            user.username,
            user.balance,
            investment,
            stock_value,
        )
    }

    /// Unrealised return in percent; 0.0 when nothing is invested.
    pub async fn total_return_rate(&self, user_id: i64) -> ServiceResult<f64> {
        let mut conn = self.pool.acquire().await?;
        let positions = portfolios::valuations_by_user(&mut *conn, user_id).await?;
        let (investment, stock_value) = totals(&positions)?;
        Ok(profit_loss_rate(stock_value - investment, investment))
    }

    pub async fn trade_statistics(&self, user_id: i64) -> ServiceResult<TradeStatistics> {
        let mut conn = self.pool.acquire().await?;
        transactions::statistics(&mut *conn, user_id).await
    }

    pub async fn daily_transactions(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<Vec<DailyTransaction>> {
        if start > end {
            return Err(ServiceError::invalid(
                "startDate",
                "start date must not be after end date",
            ));
        }
        debug!("AnalysisService: daily transactions for user {} from {} to {}", user_id, start, end);

        let mut conn = self.pool.acquire().await?;
        transactions::daily(&mut *conn, user_id, start, end).await
    }
}
