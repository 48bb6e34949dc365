pub mod persistence;
pub mod session;

pub use persistence::Database;
pub use session::InMemorySessionStore;
