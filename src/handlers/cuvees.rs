use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::db::cuvees as cuvee_db;
use crate::error::{ApiError, ApiResult};
use crate::models::cuvees::CuveeInput;

/// GET /api/cuvees: the public catalogue.
pub async fn get_cuvees(db: web::Data<DatabaseConnection>) -> ApiResult<HttpResponse> {
    let cuvees = cuvee_db::get_all_cuvees(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(cuvees))
}

/// GET /api/cuvees/{id}
pub async fn get_cuvee(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let cuvee = cuvee_db::get_cuvee_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Cuvée"))?;

    Ok(HttpResponse::Ok().json(cuvee))
}

/// POST /api/cuvees: add a cuvée to the catalogue (admin).
pub async fn create_cuvee(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CuveeInput>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let cuvee = cuvee_db::insert_cuvee(db.get_ref(), body).await?;
    Ok(HttpResponse::Created().json(cuvee))
}

/// PUT /api/cuvees/{id}: full update (admin).
pub async fn update_cuvee(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CuveeInput>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let cuvee = cuvee_db::get_cuvee_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Cuvée"))?;
    let updated = cuvee_db::update_cuvee(db.get_ref(), cuvee, body).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/cuvees/{id}: returns the removed row (admin).
pub async fn delete_cuvee(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    let cuvee = cuvee_db::get_cuvee_by_id(db.get_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Cuvée"))?;
    cuvee_db::delete_cuvee(db.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(cuvee))
}
