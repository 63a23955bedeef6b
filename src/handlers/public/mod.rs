// handlers/public/mod.rs - reachable without a session
pub mod auth;
pub mod health;

pub use auth::*;
pub use health::health;
