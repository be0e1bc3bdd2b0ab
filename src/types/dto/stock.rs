use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::stock_item;
use crate::types::internal::MovementKind;

/// Request model for creating a stock item
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateStockItemRequest {
    /// Item name (unique, case-insensitive)
    pub name: String,
}

/// Request model for a stock movement. Creation and stocking are separate
/// operations, so this is the only way quantity changes.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct StockMovementRequest {
    /// Movement direction: "entrada" (in) or "saida" (out)
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub kind: MovementKind,

    /// Number of units moved (must be positive)
    pub quantity: i32,
}

/// Response model for a stock item
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct StockItemResponse {
    /// Numeric item id
    pub id: i32,

    /// Item name
    pub name: String,

    /// Current quantity on hand
    pub quantity: i32,

    /// Username of the creator, captured at creation time
    pub created_by_username: String,
}

impl From<stock_item::Model> for StockItemResponse {
    fn from(item: stock_item::Model) -> Self {
        Self {
            id: item.id,
            name: item.name,
            quantity: item.quantity,
            created_by_username: item.created_by_username,
        }
    }
}
