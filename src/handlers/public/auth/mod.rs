// Login and logout for the super-administrator
pub mod login;
pub mod logout;

pub use login::{login_get, login_post};
pub use logout::logout;
