use sea_orm::*;
use uuid::Uuid;

use crate::models::vineyards::{self, VineyardInput};

/// Insert a new vineyard.
pub async fn insert_vineyard(
    db: &DatabaseConnection,
    input: VineyardInput,
) -> Result<vineyards::Model, DbErr> {
    let new_vineyard = vineyards::ActiveModel {
        id: Set(Uuid::new_v4()),
        cepages: Set(input.cepages_json()),
        nom: Set(input.nom),
        localisation: Set(input.localisation),
        superficie: Set(input.superficie),
        description: Set(input.description),
        image: Set(input.image),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_vineyard.insert(db).await
}

/// Fetch all vineyards.
pub async fn get_all_vineyards(db: &DatabaseConnection) -> Result<Vec<vineyards::Model>, DbErr> {
    vineyards::Entity::find()
        .order_by_asc(vineyards::Column::Nom)
        .all(db)
        .await
}

/// Fetch a single vineyard by ID.
pub async fn get_vineyard_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<vineyards::Model>, DbErr> {
    vineyards::Entity::find_by_id(id).one(db).await
}

/// Replace every editable field of an existing vineyard.
pub async fn update_vineyard(
    db: &DatabaseConnection,
    vineyard: vineyards::Model,
    input: VineyardInput,
) -> Result<vineyards::Model, DbErr> {
    let mut active: vineyards::ActiveModel = vineyard.into();

    active.cepages = Set(input.cepages_json());
    active.nom = Set(input.nom);
    active.localisation = Set(input.localisation);
    active.superficie = Set(input.superficie);
    active.description = Set(input.description);
    active.image = Set(input.image);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a vineyard by ID.
pub async fn delete_vineyard(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    vineyards::Entity::delete_by_id(id).exec(db).await
}
