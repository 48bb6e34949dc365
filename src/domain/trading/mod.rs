pub mod analysis;
pub mod portfolio;
pub mod stock;
pub mod transaction;
pub mod types;
pub mod user;

pub use portfolio::{Portfolio, PositionAfterSell};
pub use stock::ListedStock;
pub use transaction::{Transaction, TransactionView};
pub use types::TradeType;
pub use user::User;
