use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// SeaORM entity for the `partenaire` table: countries orders may ship to.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partenaire")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePartenaire {
    #[validate(length(min = 2, max = 8, message = "Code pays invalide"))]
    pub code: String,
    #[validate(length(min = 1, message = "Le nom du pays est obligatoire"))]
    pub name: String,
}

/// Country codes are stored upper-case so lookups can be exact.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_trimmed_and_upper_cased() {
        assert_eq!(normalize_code(" fr "), "FR");
        assert_eq!(normalize_code("Mg"), "MG");
    }
}
