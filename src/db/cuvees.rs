use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::cuvees::{self, CuveeInput};

/// Insert a new cuvée.
pub async fn insert_cuvee(
    db: &DatabaseConnection,
    input: CuveeInput,
) -> Result<cuvees::Model, DbErr> {
    let new_cuvee = cuvees::ActiveModel {
        id: Set(Uuid::new_v4()),
        nom: Set(input.nom),
        annee: Set(input.annee),
        wine_type: Set(input.wine_type),
        cepage: Set(input.cepage),
        description: Set(input.description),
        prix: Set(input.prix),
        stock: Set(input.stock),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_cuvee.insert(db).await
}

/// Fetch the whole catalogue.
pub async fn get_all_cuvees(db: &DatabaseConnection) -> Result<Vec<cuvees::Model>, DbErr> {
    cuvees::Entity::find()
        .order_by_asc(cuvees::Column::Nom)
        .all(db)
        .await
}

/// Fetch a single cuvée by ID.
pub async fn get_cuvee_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<cuvees::Model>, DbErr> {
    cuvees::Entity::find_by_id(id).one(db).await
}

/// Replace every editable field of an existing cuvée.
pub async fn update_cuvee(
    db: &DatabaseConnection,
    cuvee: cuvees::Model,
    input: CuveeInput,
) -> Result<cuvees::Model, DbErr> {
    let mut active: cuvees::ActiveModel = cuvee.into();

    active.nom = Set(input.nom);
    active.annee = Set(input.annee);
    active.wine_type = Set(input.wine_type);
    active.cepage = Set(input.cepage);
    active.description = Set(input.description);
    active.prix = Set(input.prix);
    active.stock = Set(input.stock);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a cuvée by ID.
pub async fn delete_cuvee(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    cuvees::Entity::delete_by_id(id).exec(db).await
}

/// Remove `quantity` bottles from a cuvée's stock, only if enough remain.
///
/// Returns `false` when the cuvée is missing or short; nothing is written then.
pub async fn decrement_stock<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    quantity: i32,
) -> Result<bool, DbErr> {
    let result = cuvees::Entity::update_many()
        .col_expr(
            cuvees::Column::Stock,
            Expr::cust_with_values("stock - ?", [quantity]),
        )
        .col_expr(
            cuvees::Column::UpdatedAt,
            Expr::value(Some(chrono::Utc::now())),
        )
        .filter(cuvees::Column::Id.eq(id))
        .filter(cuvees::Column::Stock.gte(quantity))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}
