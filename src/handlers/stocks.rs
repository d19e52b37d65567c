use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::db::cuvees as cuvee_db;
use crate::db::stocks as stock_db;
use crate::error::{ApiError, ApiResult};
use crate::models::cuvees::stock_alerts;
use crate::models::stocks::{CreateStock, StockView, UpdateStock};

/// GET /api/stocks: stock rows with their cuvée name (admin).
pub async fn get_stocks(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let stocks = stock_db::get_all_stock_views(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stocks))
}

/// GET /api/stocks/alerts: cuvées running low, most critical first (admin).
pub async fn get_stock_alerts(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let cuvees = cuvee_db::get_all_cuvees(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stock_alerts(&cuvees)))
}

/// GET /api/stocks/{id}
pub async fn get_stock(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let view = stock_db::get_stock_view_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Stock"))?;

    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/stocks: the cuvée must exist.
pub async fn create_stock(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateStock>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let cuvee = cuvee_db::get_cuvee_by_id(db.get_ref(), body.cuvee_id)
        .await?
        .ok_or(ApiError::NotFound("Cuvée"))?;
    let stock = stock_db::insert_stock(db.get_ref(), body).await?;

    Ok(HttpResponse::Created().json(StockView::new(stock, Some(cuvee))))
}

/// PUT /api/stocks/{id}: set quantity and location.
pub async fn update_stock(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStock>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let stock = stock_db::get_stock_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Stock"))?;
    let updated = stock_db::update_stock(db.get_ref(), stock, body).await?;
    let cuvee = cuvee_db::get_cuvee_by_id(db.get_ref(), updated.cuvee_id).await?;

    Ok(HttpResponse::Ok().json(StockView::new(updated, cuvee)))
}

/// DELETE /api/stocks/{id}: returns the removed row.
pub async fn delete_stock(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    let view = stock_db::get_stock_view_by_id(db.get_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Stock"))?;
    stock_db::delete_stock(db.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(view))
}
