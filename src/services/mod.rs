pub mod credential_service;
pub mod provisioner;
pub mod tenant_service;
pub mod user_service;

pub use credential_service::{CredentialError, CredentialService, Reauthenticated};
pub use tenant_service::{Repaired, TenantError, TenantService};
pub use user_service::{TenantUserService, UserError};
