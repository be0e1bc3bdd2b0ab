use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;
use crate::types::db::Role;

/// Request model for creating a user
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Username for the new account (must be unique)
    pub username: String,

    /// Role for the new account
    pub role: Role,

    /// Initial password. Only meaningful for admin accounts.
    pub password: Option<String>,
}

/// Full user projection. The password hash is never exposed.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// Numeric user id
    pub id: i32,

    /// Username
    pub username: String,

    /// Role of the account
    pub role: Role,
}

/// Reduced projection for the unauthenticated listing: username and role only.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PublicUserResponse {
    /// Username
    pub username: String,

    /// Role of the account
    pub role: Role,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
        }
    }
}

impl From<user::Model> for PublicUserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            username: u.username,
            role: u.role,
        }
    }
}
