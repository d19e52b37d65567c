use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::db::vineyards as vineyard_db;
use crate::error::{ApiError, ApiResult};
use crate::models::vineyards::VineyardInput;

/// GET /api/vineyards: every parcel (admin).
pub async fn get_vineyards(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let vineyards = vineyard_db::get_all_vineyards(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(vineyards))
}

/// GET /api/vineyards/{id}
pub async fn get_vineyard(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let vineyard = vineyard_db::get_vineyard_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Vignoble"))?;

    Ok(HttpResponse::Ok().json(vineyard))
}

/// POST /api/vineyards: register a parcel (admin).
pub async fn create_vineyard(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<VineyardInput>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let vineyard = vineyard_db::insert_vineyard(db.get_ref(), body).await?;
    Ok(HttpResponse::Created().json(vineyard))
}

/// PUT /api/vineyards/{id}: full update (admin).
pub async fn update_vineyard(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<VineyardInput>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let vineyard = vineyard_db::get_vineyard_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Vignoble"))?;
    let updated = vineyard_db::update_vineyard(db.get_ref(), vineyard, body).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/vineyards/{id}: returns the removed row.
pub async fn delete_vineyard(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    let vineyard = vineyard_db::get_vineyard_by_id(db.get_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Vignoble"))?;
    vineyard_db::delete_vineyard(db.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(vineyard))
}
