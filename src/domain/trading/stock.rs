use chrono::NaiveDateTime;
use serde::Serialize;

/// Listed stock identified by a unique ticker code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedStock {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub current_price: i64,
    pub previous_price: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
