pub mod bootstrap;
pub mod manager;
pub mod models;
pub mod schema_name;

pub use bootstrap::bootstrap;
pub use manager::{DatabaseError, DatabaseManager};
pub use schema_name::{slug, SchemaName};
