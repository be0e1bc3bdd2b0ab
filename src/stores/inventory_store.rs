use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::errors::ApiError;
use crate::types::db::stock_item::{self, Entity as StockItem};
use crate::types::internal::MovementKind;

/// Repository for stock items and their movement invariants: names are unique
/// case-insensitively, quantities never go negative, and items are deletable
/// only once fully depleted.
pub struct InventoryStore {
    db: DatabaseConnection,
}

impl InventoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a stock item. Quantity always starts at zero; stocking is a
    /// separate operation. The unique index on `lower(name)` is the
    /// authoritative guard against duplicate names under concurrency.
    pub async fn create_item(
        &self,
        name: &str,
        creator_id: i32,
        creator_username: &str,
    ) -> Result<stock_item::Model, ApiError> {
        let existing = StockItem::find()
            .filter(Expr::expr(Func::lower(Expr::col(stock_item::Column::Name))).eq(name.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| ApiError::database("create_item", e))?;

        if existing.is_some() {
            return Err(ApiError::conflict(format!(
                "Item '{}' already exists in the inventory",
                name
            )));
        }

        let model = stock_item::ActiveModel {
            id: ActiveValue::NotSet,
            name: Set(name.to_string()),
            quantity: Set(0),
            created_by_id: Set(Some(creator_id)),
            created_by_username: Set(creator_username.to_string()),
        };

        model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ApiError::conflict(format!("Item '{}' already exists in the inventory", name))
            } else {
                ApiError::database("create_item", e)
            }
        })
    }

    /// Case-insensitive substring search on the item name. An empty search
    /// string returns the whole inventory.
    pub async fn list(&self, search: &str) -> Result<Vec<stock_item::Model>, ApiError> {
        let mut query = StockItem::find().order_by_asc(stock_item::Column::Id);

        if !search.is_empty() {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(stock_item::Column::Name))).like(pattern),
            );
        }

        query
            .all(&self.db)
            .await
            .map_err(|e| ApiError::database("list_items", e))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<stock_item::Model>, ApiError> {
        StockItem::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ApiError::database("get_item", e))
    }

    /// Apply a stock movement and return the updated item.
    ///
    /// The quantity change is a single conditional UPDATE so concurrent
    /// movements on the same item serialize at the storage layer: an outbound
    /// movement only takes effect when enough stock remains, which makes a
    /// negative quantity unreachable even under races.
    pub async fn apply_movement(
        &self,
        id: i32,
        kind: MovementKind,
        amount: i32,
    ) -> Result<stock_item::Model, ApiError> {
        if amount <= 0 {
            return Err(ApiError::invalid_movement(
                "Movement amount must be a positive integer",
            ));
        }

        let item = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Item not found"))?;

        let update = match kind {
            MovementKind::Inbound => StockItem::update_many()
                .col_expr(
                    stock_item::Column::Quantity,
                    Expr::col(stock_item::Column::Quantity).add(amount),
                )
                .filter(stock_item::Column::Id.eq(id)),
            MovementKind::Outbound => StockItem::update_many()
                .col_expr(
                    stock_item::Column::Quantity,
                    Expr::col(stock_item::Column::Quantity).sub(amount),
                )
                .filter(stock_item::Column::Id.eq(id))
                .filter(stock_item::Column::Quantity.gte(amount)),
        };

        let result = update
            .exec(&self.db)
            .await
            .map_err(|e| ApiError::database("apply_movement", e))?;

        if result.rows_affected == 0 {
            // An inbound update only misses when the row vanished underneath
            // us; an outbound miss means the stock guard rejected the change.
            return Err(match kind {
                MovementKind::Inbound => ApiError::not_found("Item not found"),
                MovementKind::Outbound => ApiError::invalid_movement(format!(
                    "Cannot remove {} units from item '{}': only {} in stock",
                    amount, item.name, item.quantity
                )),
            });
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Item not found"))
    }

    /// Delete an item, allowed only once its quantity is exactly zero. The
    /// zero-quantity condition rides on the DELETE itself so a concurrent
    /// inbound movement cannot slip between check and removal.
    pub async fn delete_item(&self, id: i32) -> Result<stock_item::Model, ApiError> {
        let item = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Item not found"))?;

        let result = StockItem::delete_many()
            .filter(stock_item::Column::Id.eq(id))
            .filter(stock_item::Column::Quantity.eq(0))
            .exec(&self.db)
            .await
            .map_err(|e| ApiError::database("delete_item", e))?;

        if result.rows_affected == 0 {
            return Err(ApiError::conflict(format!(
                "Cannot delete item '{}' while its stock is not zero",
                item.name
            )));
        }

        Ok(item)
    }
}
