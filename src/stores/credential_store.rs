use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

use crate::config::AppSettings;
use crate::errors::ApiError;
use crate::services::auth_service;
use crate::types::db::user::{self, Entity as User};
use crate::types::db::Role;

/// Repository for user records. Uniqueness of usernames is guaranteed by the
/// database constraint; the pre-insert lookup only exists to fail early with
/// a clean message.
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new user. `password_hash` must already be hashed; regular
    /// accounts store no hash at all.
    pub async fn create_user(
        &self,
        username: &str,
        role: Role,
        password_hash: Option<String>,
    ) -> Result<user::Model, ApiError> {
        let existing = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| ApiError::database("create_user", e))?;

        if existing.is_some() {
            return Err(ApiError::conflict(format!(
                "Username '{}' is already in use",
                username
            )));
        }

        let model = user::ActiveModel {
            id: ActiveValue::NotSet,
            username: Set(username.to_string()),
            role: Set(role),
            password_hash: Set(password_hash),
        };

        model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ApiError::conflict(format!("Username '{}' is already in use", username))
            } else {
                ApiError::database("create_user", e)
            }
        })
    }

    /// Create the configured default admin account if it does not exist yet.
    /// Idempotent; must run before the process starts serving traffic.
    pub async fn ensure_admin_bootstrap(&self, settings: &AppSettings) -> Result<(), ApiError> {
        if self
            .get_by_username(&settings.admin_username)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let hash = auth_service::hash_password(&settings.admin_password)?;
        self.create_user(&settings.admin_username, Role::Admin, Some(hash))
            .await?;
        tracing::info!(username = %settings.admin_username, "bootstrap admin account created");
        Ok(())
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<user::Model>, ApiError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| ApiError::database("get_by_username", e))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<user::Model>, ApiError> {
        User::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ApiError::database("get_by_id", e))
    }

    /// List users in stable insertion order.
    pub async fn list(&self, offset: u64, limit: u64) -> Result<Vec<user::Model>, ApiError> {
        User::find()
            .order_by_asc(user::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| ApiError::database("list_users", e))
    }

    pub async fn count(&self) -> Result<u64, ApiError> {
        User::find()
            .count(&self.db)
            .await
            .map_err(|e| ApiError::database("count_users", e))
    }

    /// Delete a user by id. Admin-role accounts can never be deleted through
    /// this path.
    pub async fn delete_user(&self, id: i32) -> Result<user::Model, ApiError> {
        let user = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if user.role == Role::Admin {
            return Err(ApiError::forbidden(
                "Administrator accounts cannot be deleted",
            ));
        }

        User::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ApiError::database("delete_user", e))?;

        Ok(user)
    }
}
