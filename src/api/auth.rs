use std::sync::Arc;

use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::{AuthService, TokenService};
use crate::types::dto::auth::{LoginRequest, TokenResponse};
use crate::types::dto::user::UserResponse;

/// Authentication API endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
    token_service: Arc<TokenService>,
}

impl AuthApi {
    pub fn new(auth_service: Arc<AuthService>, token_service: Arc<TokenService>) -> Self {
        Self {
            auth_service,
            token_service,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with a username (and, for admin accounts, a password) to receive
    /// a bearer token
    #[oai(path = "/token", method = "post", tag = "AuthTags::Authentication")]
    pub async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, ApiError> {
        let user = self
            .auth_service
            .authenticate(&body.username, body.password.as_deref())
            .await?;

        let access_token = self.token_service.issue(&user.username, user.role, None)?;

        Ok(Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_service.default_ttl_seconds(),
        }))
    }

    /// Return the identity resolved from the presented bearer token
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    pub async fn me(&self, auth: BearerAuth) -> Result<Json<UserResponse>, ApiError> {
        let user = self.auth_service.resolve_identity(&auth.0.token).await?;

        Ok(Json(UserResponse::from(user)))
    }
}
