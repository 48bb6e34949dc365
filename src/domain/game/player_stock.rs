use crate::domain::errors::{ServiceError, ServiceResult};
use rust_decimal::Decimal;
use serde::Serialize;

/// Shares of one stock held by one player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStock {
    pub id: i64,
    pub player_id: String,
    pub stock_id: i64,
    pub quantity: i64,
}

impl PlayerStock {
    pub fn new(player_id: String, stock_id: i64, quantity: i64) -> ServiceResult<Self> {
        if quantity <= 0 {
            return Err(ServiceError::invalid("quantity", "quantity must be greater than 0"));
        }
        Ok(Self {
            id: 0,
            player_id,
            stock_id,
            quantity,
        })
    }

    pub fn add_quantity(&mut self, amount: i64) -> ServiceResult<()> {
        if amount <= 0 {
            return Err(ServiceError::invalid(
                "quantity",
                "increase amount must be greater than 0",
            ));
        }
        self.quantity = self
            .quantity
            .checked_add(amount)
            .ok_or_else(|| ServiceError::invalid("quantity", "holding is too large"))?;
        Ok(())
    }

    pub fn subtract_quantity(&mut self, amount: i64) -> ServiceResult<()> {
        if amount <= 0 {
            return Err(ServiceError::invalid(
                "quantity",
                "decrease amount must be greater than 0",
            ));
        }
        if self.quantity < amount {
            return Err(ServiceError::InsufficientQuantity(format!(
                "Insufficient quantity: held {}, requested {}",
                self.quantity, amount
            )));
        }
        self.quantity -= amount;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.quantity == 0
    }
}

/// Holding row joined with its stock, as shown on the player detail view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStockView {
    pub stock_id: i64,
    pub stock_name: String,
    pub stock_price: Decimal,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStockList {
    pub player_id: String,
    pub player_money: Decimal,
    pub stocks: Vec<PlayerStockView>,
}
