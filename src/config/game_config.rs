//! Game rules: starting cash and page size limit.

use super::parse_env;
use anyhow::{Result, bail};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone)]
pub struct GameEnvConfig {
    pub initial_player_money: Decimal,
    pub page_max_count: i64,
}

impl Default for GameEnvConfig {
    fn default() -> Self {
        Self {
            initial_player_money: dec!(10000),
            page_max_count: 100,
        }
    }
}

impl GameEnvConfig {
    pub fn from_env() -> Result<Self> {
        let initial_player_money = parse_env("GAME_INITIAL_PLAYER_MONEY", dec!(10000))?;
        if initial_player_money < Decimal::ZERO {
            bail!("GAME_INITIAL_PLAYER_MONEY must not be negative");
        }
        let page_max_count = parse_env("PAGE_MAX_COUNT", 100i64)?;
        if page_max_count < 1 {
            bail!("PAGE_MAX_COUNT must be at least 1");
        }
        Ok(Self {
            initial_player_money,
            page_max_count,
        })
    }
}
