//! Read-side portfolio analysis.
//!
//! All money values are whole currency units. Rates are percentages and
//! fall back to 0.0 when nothing has been invested.

use crate::domain::errors::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use serde::Serialize;

fn out_of_range() -> ServiceError {
    ServiceError::invalid("portfolio", "position value is out of range")
}

/// `quantity * price` without wrapping.
fn value_of(quantity: i64, price: i64) -> ServiceResult<i64> {
    quantity.checked_mul(price).ok_or_else(out_of_range)
}

/// Profit or loss as a percentage of the invested amount.
pub fn profit_loss_rate(profit_loss: i64, investment: i64) -> f64 {
    if investment > 0 {
        profit_loss as f64 / investment as f64 * 100.0
    } else {
        0.0
    }
}

/// A position joined with its stock, used as input for valuations.
#[derive(Debug, Clone)]
pub struct PositionValuation {
    pub portfolio_id: i64,
    pub user_id: i64,
    pub username: String,
    pub stock_id: i64,
    pub stock_code: String,
    pub stock_name: String,
    pub quantity: i64,
    pub average_price: i64,
    pub current_price: i64,
}

impl PositionValuation {
    pub fn investment(&self) -> ServiceResult<i64> {
        value_of(self.quantity, self.average_price)
    }

    pub fn current_value(&self) -> ServiceResult<i64> {
        value_of(self.quantity, self.current_price)
    }

    pub fn profit_loss(&self) -> ServiceResult<i64> {
        self.current_value()?
            .checked_sub(self.investment()?)
            .ok_or_else(out_of_range)
    }
}

/// Returns `(total_investment, total_stock_value)` over all positions, 0 when empty.
pub fn totals(positions: &[PositionValuation]) -> ServiceResult<(i64, i64)> {
    positions
        .iter()
        .try_fold((0i64, 0i64), |(investment, value), p| {
            Ok((
                investment.checked_add(p.investment()?).ok_or_else(out_of_range)?,
                value.checked_add(p.current_value()?).ok_or_else(out_of_range)?,
            ))
        })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProfitLoss {
    pub portfolio_id: i64,
    pub stock_code: String,
    pub stock_name: String,
    pub quantity: i64,
    pub average_price: i64,
    pub current_price: i64,
    pub total_investment: i64,
    pub current_value: i64,
    pub profit_loss: i64,
    pub profit_loss_rate: f64,
}

impl TryFrom<&PositionValuation> for PortfolioProfitLoss {
    type Error = ServiceError;

    fn try_from(p: &PositionValuation) -> ServiceResult<Self> {
        let total_investment = p.investment()?;
        let profit_loss = p.profit_loss()?;
        Ok(Self {
            portfolio_id: p.portfolio_id,
            stock_code: p.stock_code.clone(),
            stock_name: p.stock_name.clone(),
            quantity: p.quantity,
            average_price: p.average_price,
            current_price: p.current_price,
            total_investment,
            current_value: p.current_value()?,
            profit_loss,
            profit_loss_rate: profit_loss_rate(profit_loss, total_investment),
        })
    }
}

/// One position with its current valuation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDetail {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub stock_id: i64,
    pub stock_code: String,
    pub stock_name: String,
    pub quantity: i64,
    pub average_price: i64,
    pub current_price: i64,
    pub total_value: i64,
    pub profit_loss: i64,
}

impl TryFrom<&PositionValuation> for PositionDetail {
    type Error = ServiceError;

    fn try_from(p: &PositionValuation) -> ServiceResult<Self> {
        Ok(Self {
            id: p.portfolio_id,
            user_id: p.user_id,
            username: p.username.clone(),
            stock_id: p.stock_id,
            stock_code: p.stock_code.clone(),
            stock_name: p.stock_name.clone(),
            quantity: p.quantity,
            average_price: p.average_price,
            current_price: p.current_price,
            total_value: p.current_value()?,
            profit_loss: p.profit_loss()?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalAsset {
    pub user_id: i64,
    pub username: String,
    pub cash_balance: i64,
    pub total_stock_value: i64,
    pub total_asset: i64,
    pub total_investment: i64,
    pub total_profit_loss: i64,
    pub total_profit_loss_rate: f64,
}

impl TotalAsset {
    pub fn compute(
        user_id: i64,
        username: String,
        cash_balance: i64,
        total_investment: i64,
        total_stock_value: i64,
    ) -> ServiceResult<Self> {
        let total_profit_loss = total_stock_value
            .checked_sub(total_investment)
            .ok_or_else(out_of_range)?;
        let total_asset = cash_balance
            .checked_add(total_stock_value)
            .ok_or_else(out_of_range)?;
        Ok(Self {
            user_id,
            username,
            cash_balance,
            total_stock_value,
            total_asset,
            total_investment,
            total_profit_loss,
            total_profit_loss_rate: profit_loss_rate(total_profit_loss, total_investment),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeStatistics {
    pub user_id: i64,
    pub total_trade_count: i64,
    pub buy_count: i64,
    pub sell_count: i64,
    pub total_buy_amount: i64,
    pub total_sell_amount: i64,
    pub total_buy_quantity: i64,
    pub total_sell_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTransaction {
    pub trade_date: NaiveDate,
    pub trade_count: i64,
    pub total_amount: i64,
    pub buy_count: i64,
    pub sell_count: i64,
    pub buy_amount: i64,
    pub sell_amount: i64,
}
