use crate::domain::errors::{ServiceError, ServiceResult};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Takes `quantity` units out of inventory and returns the line total.
    pub fn take_stock(&mut self, quantity: i64) -> ServiceResult<Decimal> {
        if quantity < 1 {
            return Err(ServiceError::invalid("quantity", "quantity must be 1 or greater"));
        }
        if self.stock < quantity {
            return Err(ServiceError::InsufficientStock {
                requested: quantity,
                available: self.stock,
            });
        }
        let total = self
            .price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| ServiceError::invalid("quantity", "order amount is too large"))?;
        self.stock -= quantity;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorCode;
    use crate::domain::clock;
    use rust_decimal_macros::dec;

    fn product(stock: i64) -> Product {
        let now = clock::now();
        Product {
            id: 1,
            name: "Keyboard".into(),
            description: None,
            price: dec!(49.90),
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_take_stock_returns_total() {
        let mut p = product(5);
        assert_eq!(p.take_stock(3).unwrap(), dec!(149.70));
        assert_eq!(p.stock, 2);
    }

    #[test]
    fn test_take_stock_rejects_shortage() {
        let mut p = product(2);
        let err = p.take_stock(3).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientStock);
        assert_eq!(p.stock, 2);
    }

    #[test]
    fn test_take_stock_overflow_keeps_inventory() {
        let mut p = product(i64::MAX);
        p.price = dec!(1000000000000);
        let err = p.take_stock(i64::MAX).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        assert_eq!(p.stock, i64::MAX);
    }
}
