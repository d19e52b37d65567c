use sea_orm::*;

use crate::models::partenaires::{self, normalize_code};

/// Fetch all partner countries, by name.
pub async fn get_all_partenaires(
    db: &DatabaseConnection,
) -> Result<Vec<partenaires::Model>, DbErr> {
    partenaires::Entity::find()
        .order_by_asc(partenaires::Column::Name)
        .all(db)
        .await
}

/// Fetch a partner country by code, case-insensitively.
pub async fn get_partenaire(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<partenaires::Model>, DbErr> {
    partenaires::Entity::find_by_id(normalize_code(code))
        .one(db)
        .await
}

/// Whether `code` or `name` is already registered as a partner.
pub async fn partenaire_exists(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
) -> Result<bool, DbErr> {
    let count = partenaires::Entity::find()
        .filter(
            Condition::any()
                .add(partenaires::Column::Code.eq(normalize_code(code)))
                .add(partenaires::Column::Name.eq(name.trim())),
        )
        .count(db)
        .await?;

    Ok(count > 0)
}

/// Register a partner country.
pub async fn insert_partenaire(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
) -> Result<partenaires::Model, DbErr> {
    let new_partenaire = partenaires::ActiveModel {
        code: Set(normalize_code(code)),
        name: Set(name.trim().to_string()),
    };

    new_partenaire.insert(db).await
}

/// Remove a partner country by code.
pub async fn delete_partenaire(db: &DatabaseConnection, code: &str) -> Result<DeleteResult, DbErr> {
    partenaires::Entity::delete_by_id(normalize_code(code))
        .exec(db)
        .await
}
