use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `facture_items` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facture_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub facture_id: Uuid,
    pub product: String,
    pub quantity: i32,
    #[sea_orm(column_type = "Double")]
    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
    #[sea_orm(column_type = "Double")]
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::FactureId",
        to = "super::invoices::Column::Id"
    )]
    Invoice,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
