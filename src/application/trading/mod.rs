pub mod analysis_service;
pub mod stock_service;
pub mod transaction_service;
pub mod user_service;

pub use analysis_service::AnalysisService;
pub use stock_service::{ListedStockRequest, ListedStockService};
pub use transaction_service::{TradeRequest, TransactionService};
pub use user_service::{UserRequest, UserService};
