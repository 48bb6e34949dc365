pub mod player_service;
pub mod stock_service;

pub use player_service::{
    DeletePlayerRequest, PlayerCredentials, PlayerLogin, PlayerService, StockOrder,
    UpdatePlayerRequest,
};
pub use stock_service::{CreateStockRequest, DeleteStockRequest, StockService, UpdateStockRequest};
