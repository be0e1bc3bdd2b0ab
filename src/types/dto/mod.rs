pub mod auth;
pub mod common;
pub mod logs;
pub mod stock;
pub mod user;
