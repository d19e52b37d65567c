use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// SeaORM entity for the `stocks` table: a quantity of one cuvée at one location.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stocks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cuvee_id: Uuid,
    pub quantite: i32,
    pub emplacement: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cuvees::Entity",
        from = "Column::CuveeId",
        to = "super::cuvees::Column::Id"
    )]
    Cuvee,
}

impl Related<super::cuvees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cuvee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStock {
    pub cuvee_id: Uuid,
    pub quantite: i32,
    #[validate(length(min = 1, message = "L'emplacement est obligatoire"))]
    pub emplacement: String,
}

/// Body of `PUT /api/stocks/{id}`. Negative quantities are accepted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStock {
    pub quantite: i32,
    #[validate(length(min = 1, message = "L'emplacement est obligatoire"))]
    pub emplacement: String,
}

/// A stock row joined with the name of its cuvée.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockView {
    #[serde(flatten)]
    pub stock: Model,
    pub cuvee_nom: String,
}

impl StockView {
    pub fn new(stock: Model, cuvee: Option<super::cuvees::Model>) -> Self {
        Self {
            stock,
            cuvee_nom: cuvee.map(|c| c.nom).unwrap_or_default(),
        }
    }
}
