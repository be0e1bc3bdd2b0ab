use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stock_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub quantity: i32,
    /// Weak reference to the creating user; intentionally not a cascading
    /// foreign key so the item survives user deletion.
    pub created_by_id: Option<i32>,
    /// Denormalized at creation time and immutable thereafter.
    pub created_by_username: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
