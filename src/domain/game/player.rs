use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::password::PasswordHash;
use rust_decimal::Decimal;
use serde::Serialize;

pub const MIN_PASSWORD_LEN: usize = 4;

/// A game participant holding cash. Cash never goes negative.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: String,
    #[serde(skip_serializing)]
    pub password: PasswordHash,
    pub player_money: Decimal,
}

impl Player {
    pub fn new(player_id: String, password: &str, initial_money: Decimal) -> ServiceResult<Self> {
        if initial_money < Decimal::ZERO {
            return Err(ServiceError::invalid("playerMoney", "amount must be 0 or greater"));
        }
        let mut player = Self {
            player_id,
            password: PasswordHash::from_stored(String::new()),
            player_money: initial_money,
        };
        player.update_password(password)?;
        Ok(player)
    }

    pub fn update_password(&mut self, password: &str) -> ServiceResult<()> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::invalid(
                "playerPassword",
                format!("password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        self.password = PasswordHash::new(password);
        Ok(())
    }

    pub fn add_money(&mut self, amount: Decimal) -> ServiceResult<()> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::invalid("amount", "credit amount must be greater than 0"));
        }
        self.player_money = self
            .player_money
            .checked_add(amount)
            .ok_or_else(|| ServiceError::invalid("playerMoney", "balance is too large"))?;
        Ok(())
    }

    pub fn subtract_money(&mut self, amount: Decimal) -> ServiceResult<()> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::invalid("amount", "debit amount must be greater than 0"));
        }
        if self.player_money < amount {
            return Err(ServiceError::InsufficientFunds {
                need: amount.to_string(),
                available: self.player_money.to_string(),
            });
        }
        self.player_money -= amount;
        Ok(())
    }

    pub fn update_money(&mut self, new_amount: Decimal) -> ServiceResult<()> {
        if new_amount < Decimal::ZERO {
            return Err(ServiceError::invalid("playerMoney", "amount must be 0 or greater"));
        }
        self.player_money = new_amount;
        Ok(())
    }
}
