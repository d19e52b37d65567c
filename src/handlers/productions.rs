use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::db::productions as production_db;
use crate::error::{ApiError, ApiResult};
use crate::models::production_steps::StepInput;
use crate::models::productions::{self, CreateProduction, UpdateProduction};

async fn find_production(
    db: &DatabaseConnection,
    id: Uuid,
) -> ApiResult<productions::Model> {
    production_db::get_production_by_id(db, id)
        .await?
        .ok_or(ApiError::NotFound("Production"))
}

/// GET /api/productions
pub async fn get_productions(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let productions = production_db::get_all_productions(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(productions))
}

/// GET /api/productions/{id}
pub async fn get_production(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let production = find_production(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(production))
}

/// POST /api/productions: new lot, no steps yet.
pub async fn create_production(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateProduction>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let production = production_db::insert_production(db.get_ref(), body).await?;
    Ok(HttpResponse::Created().json(production))
}

/// PUT /api/productions/{id}: name, status, dates and description.
/// Progress only moves with the steps.
pub async fn update_production(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProduction>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let production = find_production(db.get_ref(), path.into_inner()).await?;
    let updated = production_db::update_production(db.get_ref(), production, body).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/productions/{id}: steps go with it.
pub async fn delete_production(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let production = find_production(db.get_ref(), path.into_inner()).await?;
    production_db::delete_production(db.get_ref(), production.id).await?;

    Ok(HttpResponse::Ok().json(production))
}

// ── Steps ──

/// GET /api/productions/{id}/steps: running steps first, then pending, then done.
pub async fn get_steps(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let production = find_production(db.get_ref(), path.into_inner()).await?;
    let steps = production_db::get_steps_for_production(db.get_ref(), production.id).await?;

    Ok(HttpResponse::Ok().json(steps))
}

/// GET /api/production/steps: every step of every production.
pub async fn get_all_steps(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let steps = production_db::get_all_steps(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(steps))
}

/// POST /api/productions/{id}/steps
pub async fn create_step(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<StepInput>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let production = find_production(db.get_ref(), path.into_inner()).await?;
    let step = production_db::insert_step(db.get_ref(), production.id, body).await?;

    Ok(HttpResponse::Created().json(step))
}

/// PUT /api/productions/{id}/steps/{step_id}
pub async fn update_step(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<StepInput>,
) -> ApiResult<HttpResponse> {
    let (production_id, step_id) = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let step = production_db::get_step(db.get_ref(), production_id, step_id)
        .await?
        .ok_or(ApiError::NotFound("Étape de production"))?;
    let updated = production_db::update_step(db.get_ref(), step, body).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/productions/{id}/steps/{step_id}: returns the removed step.
pub async fn delete_step(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (production_id, step_id) = path.into_inner();

    let step = production_db::get_step(db.get_ref(), production_id, step_id)
        .await?
        .ok_or(ApiError::NotFound("Étape de production"))?;
    production_db::delete_step(db.get_ref(), &step).await?;

    Ok(HttpResponse::Ok().json(step))
}
