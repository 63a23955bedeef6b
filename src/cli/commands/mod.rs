pub mod admin;
pub mod db;
pub mod tenant;
