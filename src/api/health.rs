use chrono::Utc;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::types::dto::common::HealthResponse;

/// Liveness probe for the stock ledger backend. Stateless; reports nothing
/// about the database or the stores.
pub struct HealthApi;

/// API tags for health endpoints
#[derive(Tags)]
enum HealthTags {
    /// Liveness endpoints
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Report that the service is up, with its version and the server time
    #[oai(path = "/health", method = "get", tag = "HealthTags::Health")]
    pub async fn health(&self) -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
