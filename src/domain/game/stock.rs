use crate::domain::errors::{ServiceError, ServiceResult};
use rust_decimal::Decimal;
use serde::Serialize;

/// A tradable stock in the game. Price is always positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStock {
    pub id: i64,
    pub stock_name: String,
    pub stock_price: Decimal,
}

impl GameStock {
    /// Builds an unsaved stock; `id` is assigned on insert.
    pub fn new(stock_name: &str, stock_price: Decimal) -> ServiceResult<Self> {
        let mut stock = Self {
            id: 0,
            stock_name: String::new(),
            stock_price: Decimal::ONE,
        };
        stock.update_stock_name(stock_name)?;
        stock.update_stock_price(stock_price)?;
        Ok(stock)
    }

    pub fn update_stock_name(&mut self, stock_name: &str) -> ServiceResult<()> {
        if stock_name.trim().is_empty() {
            return Err(ServiceError::invalid("stockName", "stock name is required"));
        }
        self.stock_name = stock_name.to_string();
        Ok(())
    }

    pub fn update_stock_price(&mut self, stock_price: Decimal) -> ServiceResult<()> {
        if stock_price <= Decimal::ZERO {
            return Err(ServiceError::invalid(
                "stockPrice",
                "stock price must be greater than 0",
            ));
        }
        self.stock_price = stock_price;
        Ok(())
    }

    /// Cost of `quantity` shares at the current price.
    pub fn total_price(&self, quantity: i64) -> ServiceResult<Decimal> {
        self.stock_price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| ServiceError::invalid("quantity", "order amount is too large"))
    }
}
