// handlers/elevated/mod.rs - irreversible operations, gated by password re-entry
pub mod permanent_delete;

pub use permanent_delete::{permanent_delete_get, permanent_delete_post};
