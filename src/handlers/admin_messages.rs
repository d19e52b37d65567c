use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::db::admin_messages as message_db;
use crate::db::users as user_db;
use crate::error::{ApiError, ApiResult};
use crate::models::admin_messages::CreateAdminMessage;

const MISSING_FIELDS: &str = "Email et message sont obligatoires.";

/// GET /api/admin_messages: newest first (admin).
pub async fn get_messages(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let messages = message_db::get_all_messages(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// POST /api/admin_messages: anonymous contact form.
pub async fn create_message(
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateAdminMessage>,
) -> ApiResult<HttpResponse> {
    store_message(db.get_ref(), None, body.into_inner()).await
}

/// POST /api/admin_messages/{user_id}: contact form sent by a known user.
pub async fn create_user_message(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CreateAdminMessage>,
) -> ApiResult<HttpResponse> {
    let user_id = path.into_inner();
    if user_db::get_user_by_id(db.get_ref(), user_id).await?.is_none() {
        return Err(ApiError::NotFound("Utilisateur"));
    }

    store_message(db.get_ref(), Some(user_id), body.into_inner()).await
}

async fn store_message(
    db: &DatabaseConnection,
    user_id: Option<Uuid>,
    body: CreateAdminMessage,
) -> ApiResult<HttpResponse> {
    body.validate()
        .map_err(|_| ApiError::BadRequest(MISSING_FIELDS.into()))?;

    let message = message_db::insert_message(db, user_id, body).await?;
    Ok(HttpResponse::Created().json(message))
}

/// PATCH /api/admin_messages/{id}/read
pub async fn mark_read(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let message = message_db::mark_read(db.get_ref(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Message"))?;

    Ok(HttpResponse::Ok().json(message))
}

/// PATCH /api/admin_messages/read_all
pub async fn mark_all_read(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let updated = message_db::mark_all_read(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}

/// DELETE /api/admin_messages/{id}
pub async fn delete_message(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let result = message_db::delete_message(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound("Message"));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Message supprimé" })))
}

/// DELETE /api/admin_messages: clear the inbox.
pub async fn delete_all_messages(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let result = message_db::delete_all_messages(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": result.rows_affected })))
}
