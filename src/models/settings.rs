use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the only row in `settings`.
pub const SINGLETON_ID: i32 = 1;

/// SeaORM entity for the global `settings` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip)]
    pub id: i32,
    pub maintenance: bool,
    pub registration: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Default for Model {
    fn default() -> Self {
        Self {
            id: SINGLETON_ID,
            maintenance: false,
            registration: true,
        }
    }
}

/// Body of `PUT /api/settings`. Missing flags keep their current value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettings {
    pub maintenance: Option<bool>,
    pub registration: Option<bool>,
}
