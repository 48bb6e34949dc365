use crate::domain::trading::types::TradeType;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Append-only trade record. `total_amount = price * quantity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub stock_id: i64,
    pub trade_type: TradeType,
    pub quantity: i64,
    pub price: i64,
    pub total_amount: i64,
    pub transaction_date: NaiveDateTime,
}

/// Transaction joined with its user and stock for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub stock_id: i64,
    pub stock_code: String,
    pub stock_name: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub quantity: i64,
    pub price: i64,
    pub total_amount: i64,
    pub transaction_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
}
