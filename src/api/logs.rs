use std::sync::Arc;

use poem_openapi::param::Query;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::auth_service::require_admin;
use crate::services::AuthService;
use crate::stores::AuditStore;
use crate::types::dto::logs::LogEntryResponse;

/// Audit log API endpoints
pub struct LogsApi {
    audit_store: Arc<AuditStore>,
    auth_service: Arc<AuthService>,
}

impl LogsApi {
    pub fn new(audit_store: Arc<AuditStore>, auth_service: Arc<AuthService>) -> Self {
        Self {
            audit_store,
            auth_service,
        }
    }
}

/// API tags for audit log endpoints
#[derive(Tags)]
enum LogTags {
    /// Audit trail endpoints
    Logs,
}

#[OpenApi(prefix_path = "/logs")]
impl LogsApi {
    /// List audit entries, most recent first (administrators only)
    #[oai(path = "/", method = "get", tag = "LogTags::Logs")]
    pub async fn list(
        &self,
        auth: BearerAuth,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<LogEntryResponse>>, ApiError> {
        let user = self.auth_service.resolve_identity(&auth.0.token).await?;
        require_admin(&user)?;

        let entries = self
            .audit_store
            .list(offset.0.unwrap_or(0), limit.0.unwrap_or(200))
            .await?;

        Ok(Json(
            entries.into_iter().map(LogEntryResponse::from).collect(),
        ))
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
    use crate::services::auth_service::hash_password;
    use crate::services::TokenService;
    use crate::stores::CredentialStore;
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

    async fn setup_api() -> (Arc<CredentialStore>, Arc<AuditStore>, Arc<TokenService>, LogsApi)
    {
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

        let api = LogsApi::new(Arc::clone(&audit_store), auth_service);
        (credential_store, audit_store, token_service, api)
    }

    #[tokio::test]
    async fn listing_is_admin_only_and_reverse_chronological() {
        let (credential_store, audit_store, token_service, api) = setup_api().await;
        let hash = hash_password("pw").unwrap();
        credential_store
            .create_user("root", Role::Admin, Some(hash))
            .await
            .unwrap();
        credential_store
            .create_user("alice", Role::RegularUser, None)
            .await
            .unwrap();

        audit_store.append("alice", "first").await.unwrap();
        audit_store.append("alice", "second").await.unwrap();

        let admin_token = token_service.issue("root", Role::Admin, None).unwrap();
        let entries = api
            .list(
                BearerAuth(Bearer { token: admin_token }),
                Query(None),
                Query(None),
            )
            .await
            .unwrap();
        let actions: Vec<_> = entries.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["second", "first"]);

        let staff_token = token_service
            .issue("alice", Role::RegularUser, None)
            .unwrap();
        let denied = api
            .list(
                BearerAuth(Bearer { token: staff_token }),
                Query(None),
                Query(None),
            )
            .await;
        assert!(matches!(denied, Err(ApiError::Forbidden(_))));
    }
}
