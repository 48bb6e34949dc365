pub mod player;
pub mod player_stock;
pub mod stock;

pub use player::Player;
pub use player_stock::{PlayerStock, PlayerStockList, PlayerStockView};
pub use stock::GameStock;
