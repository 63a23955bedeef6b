pub mod auth;
pub mod expiry;

pub use auth::{end_session, require_admin, start_session, AdminSession};
pub use expiry::enforce_subscription_expiry;
