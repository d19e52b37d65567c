use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::ensure_self_or_admin;
use crate::auth::middleware::{AdminUser, AuthenticatedUser};
use crate::db::settings as settings_db;
use crate::db::users as user_db;
use crate::error::{ApiError, ApiResult};
use crate::models::settings::UpdateSettings;

/// GET /api/settings: maintenance and registration flags, public.
pub async fn get_settings(db: web::Data<DatabaseConnection>) -> ApiResult<HttpResponse> {
    let settings = settings_db::get_settings(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(settings))
}

/// PUT /api/settings (admin)
pub async fn update_settings(
    admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateSettings>,
) -> ApiResult<HttpResponse> {
    let settings = settings_db::update_settings(db.get_ref(), body.into_inner()).await?;
    tracing::info!(
        admin_id = %admin.0.id,
        maintenance = settings.maintenance,
        registration = settings.registration,
        "site settings changed"
    );

    Ok(HttpResponse::Ok().json(settings))
}

/// GET /api/settings/{user_id}: stored preferences, `{}` when none.
pub async fn get_user_settings(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = path.into_inner();
    ensure_self_or_admin(&user.0, user_id)?;

    let settings = settings_db::get_user_settings(db.get_ref(), user_id)
        .await?
        .map(|s| s.settings)
        .unwrap_or_else(|| serde_json::json!({}));

    Ok(HttpResponse::Ok().json(settings))
}

/// POST /api/settings/{user_id}: replace the preferences object.
pub async fn save_user_settings(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<serde_json::Value>,
) -> ApiResult<HttpResponse> {
    let user_id = path.into_inner();
    ensure_self_or_admin(&user.0, user_id)?;

    let value = body.into_inner();
    if !value.is_object() {
        return Err(ApiError::BadRequest(
            "Les préférences doivent être un objet JSON".into(),
        ));
    }

    if user_db::get_user_by_id(db.get_ref(), user_id).await?.is_none() {
        return Err(ApiError::NotFound("Utilisateur"));
    }

    let saved = settings_db::upsert_user_settings(db.get_ref(), user_id, value).await?;
    Ok(HttpResponse::Ok().json(saved.settings))
}
