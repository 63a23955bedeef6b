// Dashboard pages
pub mod hoa_create;
pub mod hoa_user_create;
pub mod manage_hoa;
pub mod recycle_bin;
pub mod security;

pub use hoa_create::{hoa_create_get, hoa_create_post};
pub use hoa_user_create::{hoa_user_create_get, hoa_user_create_post};
pub use manage_hoa::{hoa_edit_get, hoa_edit_post, hoa_users, manage_hoa};
pub use recycle_bin::recycle_bin;
pub use security::{security_get, security_post};
