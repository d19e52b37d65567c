use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// SeaORM entity for the `order_items` table.
///
/// JSON keeps the historical mixed casing: `order_id` but `clientId`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub quantity: i32,
    pub order_id: Uuid,
    #[serde(rename = "clientId")]
    pub client_id: Uuid,
    #[serde(rename = "cuveeId")]
    pub cuvee_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Order,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Body of `POST /api/order_items/{client_id}/{order_id}`.
///
/// `id` is the cuvée, when the caller knows it. Adding an item this way does
/// not touch stock.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderItem {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Le nom du produit est obligatoire"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "Le prix doit être positif"))]
    pub price: f64,
    #[validate(range(min = 1, message = "La quantité doit être supérieure à zéro"))]
    pub quantity: i32,
}
