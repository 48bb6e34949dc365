// Wiring of services from configuration
pub mod bootstrap;

// Game API: players, stocks and orders
pub mod game;

// Shop API: members, products and purchases
pub mod shop;

// Trading API: users, listed stocks, trades and analysis
pub mod trading;
