// State-changing links from the dashboard listings
pub mod tenant;
pub mod user;

pub use tenant::{delete_hoa_get, delete_hoa_post, restore_hoa, toggle_hoa};
pub use user::{delete_user, toggle_user};
