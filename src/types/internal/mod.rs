pub mod auth;
pub mod movement;

pub use auth::Claims;
pub use movement::MovementKind;
