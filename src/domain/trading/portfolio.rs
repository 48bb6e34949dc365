use crate::domain::errors::{ServiceError, ServiceResult};
use serde::Serialize;

/// A user's open position in one stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: i64,
    pub user_id: i64,
    pub stock_id: i64,
    pub quantity: i64,
    pub average_price: i64,
}

/// What is left of a position after a sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionAfterSell {
    Open,
    Closed,
}

impl Portfolio {
    /// Fresh position opened by a buy at `price`.
    pub fn open(user_id: i64, stock_id: i64, quantity: i64, price: i64) -> ServiceResult<Self> {
        if quantity <= 0 {
            return Err(ServiceError::invalid("quantity", "quantity must be greater than 0"));
        }
        Ok(Self {
            id: 0,
            user_id,
            stock_id,
            quantity,
            average_price: price,
        })
    }

    /// Adds shares and recomputes the weighted average price.
    /// The average is truncated to a whole unit.
    pub fn apply_buy(&mut self, quantity: i64, price: i64) -> ServiceResult<()> {
        if quantity <= 0 {
            return Err(ServiceError::invalid("quantity", "quantity must be greater than 0"));
        }
        let too_large = || ServiceError::invalid("quantity", "position size is out of range");
        let total_quantity = self.quantity.checked_add(quantity).ok_or_else(too_large)?;
        let total_value = self
            .quantity
            .checked_mul(self.average_price)
            .zip(quantity.checked_mul(price))
            .and_then(|(held, bought)| held.checked_add(bought))
            .ok_or_else(too_large)?;
        self.average_price = total_value / total_quantity;
        self.quantity = total_quantity;
        Ok(())
    }

    /// Removes shares. Average price is unchanged.
    pub fn apply_sell(&mut self, quantity: i64) -> ServiceResult<PositionAfterSell> {
        if quantity <= 0 {
            return Err(ServiceError::invalid("quantity", "quantity must be greater than 0"));
        }
        if self.quantity < quantity {
            return Err(ServiceError::InsufficientQuantity(format!(
                "Insufficient quantity: held {}, requested {}",
                self.quantity, quantity
            )));
        }
        self.quantity -= quantity;
        if self.quantity == 0 {
            Ok(PositionAfterSell::Closed)
        } else {
            Ok(PositionAfterSell::Open)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorCode;

    #[test]
    fn test_buy_recomputes_weighted_average() {
        // 10 @ 100 then 5 @ 130 => (1000 + 650) / 15 = 110
        let mut position = Portfolio::open(1, 1, 10, 100).unwrap();
        position.apply_buy(5, 130).unwrap();
        assert_eq!(position.quantity, 15);
        assert_eq!(position.average_price, 110);
    }

    #[test]
    fn test_average_truncates() {
        // (1 * 100 + 2 * 101) / 3 = 302 / 3 = 100.66 -> 100
        let mut position = Portfolio::open(1, 1, 1, 100).unwrap();
        position.apply_buy(2, 101).unwrap();
        assert_eq!(position.average_price, 100);
    }

    #[test]
    fn test_buy_overflow_leaves_position_untouched() {
        let mut position = Portfolio::open(1, 1, 2, i64::MAX / 3).unwrap();
        let err = position.apply_buy(2, i64::MAX / 3).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        assert_eq!(position.quantity, 2);
        assert_eq!(position.average_price, i64::MAX / 3);

        let mut position = Portfolio::open(1, 1, i64::MAX, 1).unwrap();
        assert!(position.apply_buy(1, 1).is_err());
        assert_eq!(position.quantity, i64::MAX);
    }

    #[test]
    fn test_sell_keeps_average_and_closes_at_zero() {
        let mut position = Portfolio::open(1, 1, 10, 100).unwrap();
        assert_eq!(position.apply_sell(4).unwrap(), PositionAfterSell::Open);
        assert_eq!(position.quantity, 6);
        assert_eq!(position.average_price, 100);
        assert_eq!(position.apply_sell(6).unwrap(), PositionAfterSell::Closed);
    }

    #[test]
    fn test_oversell_rejected() {
        let mut position = Portfolio::open(1, 1, 3, 100).unwrap();
        let err = position.apply_sell(4).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientQuantity);
        assert_eq!(position.quantity, 3);
    }
}
