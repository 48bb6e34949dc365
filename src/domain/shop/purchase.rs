use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// Purchase joined with member and product names.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub id: i64,
    pub member_id: i64,
    pub member_name: String,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub total_price: Decimal,
    pub purchased_at: NaiveDateTime,
}

/// Row to insert; `total_price` is fixed at purchase time.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub member_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub total_price: Decimal,
    pub purchased_at: NaiveDateTime,
}
