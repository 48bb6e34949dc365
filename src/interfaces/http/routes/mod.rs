pub mod game;
pub mod shop;
pub mod trading;
