use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// SeaORM entity for the `vignobles` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vignobles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nom: String,
    pub localisation: String,
    /// Surface in hectares.
    #[sea_orm(column_type = "Double")]
    pub superficie: f64,
    /// JSON array of grape varieties.
    #[sea_orm(column_type = "Json")]
    pub cepages: Json,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Body of `POST /api/vineyards` and `PUT /api/vineyards/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VineyardInput {
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub nom: String,
    #[validate(length(min = 1, message = "La localisation est obligatoire"))]
    pub localisation: String,
    #[validate(range(min = 0.0, message = "La superficie doit être positive"))]
    pub superficie: f64,
    #[serde(default)]
    pub cepages: Vec<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl VineyardInput {
    pub fn cepages_json(&self) -> Json {
        Json::from(self.cepages.clone())
    }
}
