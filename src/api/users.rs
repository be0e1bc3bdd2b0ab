use std::sync::Arc;

use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::auth_service::{hash_password, require_admin};
use crate::services::AuthService;
use crate::stores::{AuditStore, CredentialStore};
use crate::types::db::user;
use crate::types::dto::user::{CreateUserRequest, PublicUserResponse, UserResponse};

/// User management API endpoints
pub struct UsersApi {
    credential_store: Arc<CredentialStore>,
    audit_store: Arc<AuditStore>,
    auth_service: Arc<AuthService>,
}

impl UsersApi {
    pub fn new(
        credential_store: Arc<CredentialStore>,
        audit_store: Arc<AuditStore>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        Self {
            credential_store,
            audit_store,
            auth_service,
        }
    }

    async fn admin_identity(&self, auth: &BearerAuth) -> Result<user::Model, ApiError> {
        let user = self.auth_service.resolve_identity(&auth.0.token).await?;
        require_admin(&user)?;
        Ok(user)
    }
}

/// API tags for user endpoints
#[derive(Tags)]
enum UserTags {
    /// User management endpoints
    Users,
}

#[OpenApi(prefix_path = "/users")]
impl UsersApi {
    /// Public listing: username and role only, no authentication required
    #[oai(path = "/public", method = "get", tag = "UserTags::Users")]
    pub async fn list_public(&self) -> Result<Json<Vec<PublicUserResponse>>, ApiError> {
        let users = self.credential_store.list(0, 100).await?;

        Ok(Json(
            users.into_iter().map(PublicUserResponse::from).collect(),
        ))
    }

    /// Full user listing (administrators only)
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    pub async fn list(
        &self,
        auth: BearerAuth,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        self.admin_identity(&auth).await?;

        let users = self
            .credential_store
            .list(offset.0.unwrap_or(0), limit.0.unwrap_or(100))
            .await?;

        Ok(Json(users.into_iter().map(UserResponse::from).collect()))
    }

    /// Create a user (administrators only)
    #[oai(path = "/", method = "post", tag = "UserTags::Users")]
    pub async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let acting_admin = self.admin_identity(&auth).await?;

        let password_hash = match body.password.as_deref() {
            Some(plain) => Some(hash_password(plain)?),
            None => None,
        };

        let created = self
            .credential_store
            .create_user(&body.username, body.role, password_hash)
            .await?;

        self.audit_store
            .append(
                &acting_admin.username,
                &format!("Created user '{}'", created.username),
            )
            .await?;

        Ok(Json(UserResponse::from(created)))
    }

    /// Delete a user by id (administrators only; admin accounts are protected)
    #[oai(path = "/:user_id", method = "delete", tag = "UserTags::Users")]
    pub async fn delete(
        &self,
        auth: BearerAuth,
        user_id: Path<i32>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let acting_admin = self.admin_identity(&auth).await?;

        let deleted = self.credential_store.delete_user(user_id.0).await?;

        self.audit_store
            .append(
                &acting_admin.username,
                &format!("Deleted user '{}' (ID: {})", deleted.username, deleted.id),
            )
            .await?;

        Ok(Json(UserResponse::from(deleted)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::Bearer;
    use sea_orm::Database;

    use crate::config::AppSettings;
    use crate::services::TokenService;
    use crate::types::db::Role;

    fn test_settings() -> AppSettings {
        AppSettings {
            database_url: "sqlite::memory:".to_string(),
            secret_key: "test-secret-key-minimum-32-characters-long".to_string(),
            algorithm: Algorithm::HS256,
            access_token_ttl_minutes: 30,
            admin_username: "admin".to_string(),
            admin_password: "admin-password".to_string(),
        }
    }

    struct Fixture {
        credential_store: Arc<CredentialStore>,
        audit_store: Arc<AuditStore>,
        token_service: Arc<TokenService>,
        api: UsersApi,
    }

    async fn setup_api() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let credential_store = Arc::new(CredentialStore::new(db.clone()));
        let audit_store = Arc::new(AuditStore::new(db));
        let token_service = Arc::new(TokenService::new(&test_settings()));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&credential_store),
            Arc::clone(&token_service),
        ));

        let api = UsersApi::new(
            Arc::clone(&credential_store),
            Arc::clone(&audit_store),
            auth_service,
        );
        Fixture {
            credential_store,
            audit_store,
            token_service,
            api,
        }
    }

    fn bearer_for(fixture: &Fixture, username: &str, role: Role) -> BearerAuth {
        let token = fixture.token_service.issue(username, role, None).unwrap();
        BearerAuth(Bearer { token })
    }

    async fn seed_admin(fixture: &Fixture) -> BearerAuth {
        let hash = hash_password("pw").unwrap();
        fixture
            .credential_store
            .create_user("root", Role::Admin, Some(hash))
            .await
            .unwrap();
        bearer_for(fixture, "root", Role::Admin)
    }

    #[tokio::test]
    async fn public_listing_requires_no_authentication() {
        let fixture = setup_api().await;
        fixture
            .credential_store
            .create_user("alice", Role::RegularUser, None)
            .await
            .unwrap();

        let listing = fixture.api.list_public().await.unwrap();

        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].username, "alice");
        assert_eq!(listing[0].role, Role::RegularUser);
    }

    #[tokio::test]
    async fn create_user_is_admin_only_and_audited() {
        let fixture = setup_api().await;
        let admin_auth = seed_admin(&fixture).await;

        let created = fixture
            .api
            .create(
                admin_auth,
                Json(CreateUserRequest {
                    username: "alice".to_string(),
                    role: Role::RegularUser,
                    password: None,
                }),
            )
            .await
            .unwrap();

        assert_eq!(created.username, "alice");

        let entries = fixture.audit_store.list(0, 10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "root");
        assert_eq!(entries[0].action, "Created user 'alice'");
    }

    #[tokio::test]
    async fn regular_user_cannot_create_users() {
        let fixture = setup_api().await;
        fixture
            .credential_store
            .create_user("alice", Role::RegularUser, None)
            .await
            .unwrap();
        let alice_auth = bearer_for(&fixture, "alice", Role::RegularUser);

        let result = fixture
            .api
            .create(
                alice_auth,
                Json(CreateUserRequest {
                    username: "bob".to_string(),
                    role: Role::RegularUser,
                    password: None,
                }),
            )
            .await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn token_role_claim_is_not_trusted_for_gating() {
        let fixture = setup_api().await;
        fixture
            .credential_store
            .create_user("alice", Role::RegularUser, None)
            .await
            .unwrap();
        // Token forged with an admin role claim; the persisted role still wins.
        let forged = bearer_for(&fixture, "alice", Role::Admin);

        let result = fixture.api.list(forged, Query(None), Query(None)).await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn delete_user_is_audited_and_admins_are_protected() {
        let fixture = setup_api().await;
        let admin_auth = seed_admin(&fixture).await;
        let alice = fixture
            .credential_store
            .create_user("alice", Role::RegularUser, None)
            .await
            .unwrap();

        let deleted = fixture
            .api
            .delete(
                bearer_for(&fixture, "root", Role::Admin),
                Path(alice.id),
            )
            .await
            .unwrap();
        assert_eq!(deleted.username, "alice");

        let entries = fixture.audit_store.list(0, 10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].action,
            format!("Deleted user 'alice' (ID: {})", alice.id)
        );

        let root = fixture
            .credential_store
            .get_by_username("root")
            .await
            .unwrap()
            .unwrap();
        let result = fixture.api.delete(admin_auth, Path(root.id)).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn failed_deletion_appends_no_audit_entry() {
        let fixture = setup_api().await;
        let admin_auth = seed_admin(&fixture).await;

        let result = fixture.api.delete(admin_auth, Path(9999)).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(fixture.audit_store.count().await.unwrap(), 0);
    }
}
