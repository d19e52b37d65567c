use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::ensure_email_or_admin;
use crate::auth::middleware::{AdminUser, AuthenticatedUser};
use crate::db::invoices as invoice_db;
use crate::error::{ApiError, ApiResult};
use crate::models::invoices::{self, CreateInvoice, UpdateInvoice, UpdateInvoiceStatus};

async fn find_invoice(db: &DatabaseConnection, id: Uuid) -> ApiResult<invoices::Model> {
    invoice_db::get_invoice_by_id(db, id)
        .await?
        .ok_or(ApiError::NotFound("Facture"))
}

/// GET /api/invoices: every invoice (admin).
pub async fn get_invoices(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let invoices = invoice_db::get_all_invoices(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(invoices))
}

/// GET /api/invoices/{id}: invoice with its lines, for its addressee or an admin.
pub async fn get_invoice(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let invoice = invoice_db::get_invoice_with_items(db.get_ref(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Facture"))?;
    ensure_email_or_admin(&user.0, &invoice.invoice.customer_email)?;

    Ok(HttpResponse::Ok().json(invoice))
}

/// POST /api/invoices: invoice and lines in one transaction (admin).
pub async fn create_invoice(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateInvoice>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let created = invoice_db::create_invoice(db.get_ref(), &body).await?;
    tracing::info!(
        invoice_id = %created.invoice.id,
        total = created.invoice.total_amount,
        "invoice created"
    );

    Ok(HttpResponse::Created().json(created))
}

/// PUT /api/invoices/{id}: amount and status (admin).
pub async fn update_invoice(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateInvoice>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let invoice = find_invoice(db.get_ref(), path.into_inner()).await?;
    let updated = invoice_db::update_invoice(db.get_ref(), invoice, body).await?;

    let with_items = invoice_db::get_invoice_with_items(db.get_ref(), updated.id)
        .await?
        .ok_or(ApiError::NotFound("Facture"))?;
    Ok(HttpResponse::Ok().json(with_items))
}

/// PATCH /api/invoices/{id}/status: `paid` stamps the payment date (admin).
pub async fn update_invoice_status(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateInvoiceStatus>,
) -> ApiResult<HttpResponse> {
    let invoice = find_invoice(db.get_ref(), path.into_inner()).await?;
    let updated = invoice_db::set_invoice_status(db.get_ref(), invoice, body.status).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/invoices/{id}: returns the removed invoice and its lines (admin).
pub async fn delete_invoice(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let deleted = invoice_db::delete_invoice(db.get_ref(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Facture"))?;

    Ok(HttpResponse::Ok().json(deleted))
}

/// GET /api/invoice/items: every invoice line (admin).
pub async fn get_invoice_items(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let items = invoice_db::get_all_invoice_items(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(items))
}
