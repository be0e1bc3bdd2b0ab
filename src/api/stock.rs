use std::sync::Arc;

use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::auth_service::require_regular;
use crate::services::AuthService;
use crate::stores::{AuditStore, InventoryStore};
use crate::types::db::user;
use crate::types::dto::stock::{CreateStockItemRequest, StockItemResponse, StockMovementRequest};

/// Inventory API endpoints. All of them are reserved for regular staff
/// accounts; administrators are barred from inventory mutation.
pub struct StockApi {
    inventory_store: Arc<InventoryStore>,
    audit_store: Arc<AuditStore>,
    auth_service: Arc<AuthService>,
}

impl StockApi {
    pub fn new(
        inventory_store: Arc<InventoryStore>,
        audit_store: Arc<AuditStore>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        Self {
            inventory_store,
            audit_store,
            auth_service,
        }
    }

    async fn staff_identity(&self, auth: &BearerAuth) -> Result<user::Model, ApiError> {
        let user = self.auth_service.resolve_identity(&auth.0.token).await?;
        require_regular(&user)?;
        Ok(user)
    }
}

/// API tags for inventory endpoints
#[derive(Tags)]
enum StockTags {
    /// Stock item endpoints
    Stock,
}

#[OpenApi(prefix_path = "/stock")]
impl StockApi {
    /// Create a stock item with quantity zero
    #[oai(path = "/", method = "post", tag = "StockTags::Stock")]
    pub async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateStockItemRequest>,
    ) -> Result<Json<StockItemResponse>, ApiError> {
        let user = self.staff_identity(&auth).await?;

        let item = self
            .inventory_store
            .create_item(&body.name, user.id, &user.username)
            .await?;

        self.audit_store
            .append(
                &user.username,
                &format!("Created stock item '{}'", item.name),
            )
            .await?;

        Ok(Json(StockItemResponse::from(item)))
    }

    /// List stock items, optionally filtered by a case-insensitive substring
    #[oai(path = "/", method = "get", tag = "StockTags::Stock")]
    pub async fn list(
        &self,
        auth: BearerAuth,
        search: Query<Option<String>>,
    ) -> Result<Json<Vec<StockItemResponse>>, ApiError> {
        self.staff_identity(&auth).await?;

        let items = self
            .inventory_store
            .list(search.0.as_deref().unwrap_or(""))
            .await?;

        Ok(Json(items.into_iter().map(StockItemResponse::from).collect()))
    }

    /// Apply a stock movement to an item
    #[oai(path = "/:item_id", method = "put", tag = "StockTags::Stock")]
    pub async fn movement(
        &self,
        auth: BearerAuth,
        item_id: Path<i32>,
        body: Json<StockMovementRequest>,
    ) -> Result<Json<StockItemResponse>, ApiError> {
        let user = self.staff_identity(&auth).await?;

        let item = self
            .inventory_store
            .apply_movement(item_id.0, body.kind, body.quantity)
            .await?;

        self.audit_store
            .append(
                &user.username,
                &format!(
                    "Recorded {} of {} units for item '{}' (stock now {})",
                    body.kind.as_str(),
                    body.quantity,
                    item.name,
                    item.quantity
                ),
            )
            .await?;

        Ok(Json(StockItemResponse::from(item)))
    }

    /// Delete a stock item once its quantity is zero
    #[oai(path = "/:item_id", method = "delete", tag = "StockTags::Stock")]
    pub async fn delete(
        &self,
        auth: BearerAuth,
        item_id: Path<i32>,
    ) -> Result<Json<StockItemResponse>, ApiError> {
        let user = self.staff_identity(&auth).await?;

        let item = self.inventory_store.delete_item(item_id.0).await?;

        self.audit_store
            .append(
                &user.username,
                &format!("Deleted stock item '{}'", item.name),
            )
            .await?;

        Ok(Json(StockItemResponse::from(item)))
    }
}
