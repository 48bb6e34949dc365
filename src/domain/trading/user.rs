use crate::domain::errors::{ServiceError, ServiceResult};
use chrono::NaiveDateTime;
use serde::Serialize;

pub const MAX_USERNAME_LEN: usize = 50;

/// Trading account. Balance is in whole currency units and never negative.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub balance: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    pub fn debit(&mut self, amount: i64) -> ServiceResult<()> {
        if amount <= 0 {
            return Err(ServiceError::invalid("amount", "debit amount must be greater than 0"));
        }
        if self.balance < amount {
            return Err(ServiceError::InsufficientFunds {
                need: amount.to_string(),
                available: self.balance.to_string(),
            });
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn credit(&mut self, amount: i64) -> ServiceResult<()> {
        if amount <= 0 {
            return Err(ServiceError::invalid("amount", "credit amount must be greater than 0"));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| ServiceError::invalid("amount", "balance overflow"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorCode;
    use crate::domain::clock;

    fn user(balance: i64) -> User {
        let now = clock::now();
        User {
            id: 1,
            username: "kim".into(),
            balance,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_debit_requires_funds() {
        let mut u = user(1_000);
        let err = u.debit(1_001).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientFunds);
        u.debit(1_000).unwrap();
        assert_eq!(u.balance, 0);
    }

    #[test]
    fn test_credit_adds() {
        let mut u = user(10);
        u.credit(90).unwrap();
        assert_eq!(u.balance, 100);
        assert!(u.credit(0).is_err());
    }
}
