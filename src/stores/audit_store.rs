use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};

use crate::errors::ApiError;
use crate::types::db::log_entry::{self, Entity as LogEntry};

/// Append-only store for the audit trail. Entries are attributed by username
/// (plain text) and are never updated or deleted here; retention is someone
/// else's problem.
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one entry with a server-side timestamp.
    pub async fn append(&self, username: &str, action: &str) -> Result<log_entry::Model, ApiError> {
        if username.is_empty() || action.is_empty() {
            return Err(ApiError::internal(
                "Audit entries require a username and an action",
            ));
        }

        let entry = log_entry::ActiveModel {
            id: ActiveValue::NotSet,
            timestamp: Set(Utc::now()),
            username: Set(username.to_string()),
            action: Set(action.to_string()),
        };

        entry
            .insert(&self.db)
            .await
            .map_err(|e| ApiError::database("append_log_entry", e))
    }

    /// List entries most-recent-first. The id is a tiebreak so entries
    /// written within the same clock tick still come back in reverse
    /// insertion order.
    pub async fn list(&self, offset: u64, limit: u64) -> Result<Vec<log_entry::Model>, ApiError> {
        LogEntry::find()
            .order_by_desc(log_entry::Column::Timestamp)
            .order_by_desc(log_entry::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| ApiError::database("list_log_entries", e))
    }

    pub async fn count(&self) -> Result<u64, ApiError> {
        LogEntry::find()
            .count(&self.db)
            .await
            .map_err(|e| ApiError::database("count_log_entries", e))
    }
}
