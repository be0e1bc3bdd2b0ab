use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::log_entry;

/// Response model for an audit log entry
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LogEntryResponse {
    /// Numeric entry id
    pub id: i64,

    /// Server-side timestamp (ISO 8601)
    pub timestamp: String,

    /// The acting username
    pub username: String,

    /// Free-text description of the action taken
    pub action: String,
}

impl From<log_entry::Model> for LogEntryResponse {
    fn from(entry: log_entry::Model) -> Self {
        Self {
            id: entry.id,
            timestamp: entry.timestamp.to_rfc3339(),
            username: entry.username,
            action: entry.action,
        }
    }
}
