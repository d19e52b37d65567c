use sea_orm::*;
use uuid::Uuid;

use crate::models::cuvees;
use crate::models::stocks::{self, CreateStock, StockView, UpdateStock};

/// Insert a new stock row.
pub async fn insert_stock(
    db: &DatabaseConnection,
    input: CreateStock,
) -> Result<stocks::Model, DbErr> {
    let new_stock = stocks::ActiveModel {
        id: Set(Uuid::new_v4()),
        cuvee_id: Set(input.cuvee_id),
        quantite: Set(input.quantite),
        emplacement: Set(input.emplacement),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_stock.insert(db).await
}

/// Fetch every stock row joined with its cuvée name.
pub async fn get_all_stock_views(db: &DatabaseConnection) -> Result<Vec<StockView>, DbErr> {
    let rows = stocks::Entity::find()
        .find_also_related(cuvees::Entity)
        .order_by_asc(stocks::Column::Emplacement)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(stock, cuvee)| StockView::new(stock, cuvee))
        .collect())
}

/// Fetch one stock row joined with its cuvée name.
pub async fn get_stock_view_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<StockView>, DbErr> {
    let row = stocks::Entity::find_by_id(id)
        .find_also_related(cuvees::Entity)
        .one(db)
        .await?;

    Ok(row.map(|(stock, cuvee)| StockView::new(stock, cuvee)))
}

/// Fetch a single stock row by ID.
pub async fn get_stock_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<stocks::Model>, DbErr> {
    stocks::Entity::find_by_id(id).one(db).await
}

/// Update quantity and location of a stock row.
pub async fn update_stock(
    db: &DatabaseConnection,
    stock: stocks::Model,
    input: UpdateStock,
) -> Result<stocks::Model, DbErr> {
    let mut active: stocks::ActiveModel = stock.into();
    active.quantite = Set(input.quantite);
    active.emplacement = Set(input.emplacement);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a stock row by ID.
pub async fn delete_stock(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    stocks::Entity::delete_by_id(id).exec(db).await
}
