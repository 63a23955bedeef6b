pub mod admin;
pub mod tenant;
pub mod user;

pub use admin::Administrator;
pub use tenant::{Branding, Tenant, TenantStatus};
pub use user::TenantUser;
