// Database entities - SeaORM models
pub mod log_entry;
pub mod stock_item;
pub mod user;

pub use user::Role;
