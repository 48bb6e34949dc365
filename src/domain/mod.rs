// Wall clock truncated to storage precision
pub mod clock;

// Domain-specific error types
pub mod errors;

// Game domain: players, stocks, holdings
pub mod game;

// Page requests and paged results
pub mod pagination;

pub mod password;

// Port interfaces
pub mod ports;

// Shop domain: members, products, purchases
pub mod shop;

// Trading domain: users, listed stocks, positions, transactions, analysis
pub mod trading;

// Request validation rules
pub mod validation;
