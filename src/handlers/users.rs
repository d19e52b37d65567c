use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::ensure_self_or_admin;
use crate::auth::middleware::{AdminUser, AuthenticatedUser};
use crate::auth::password::{Verified, hash_password, verify_password};
use crate::db::users::{self as user_db, NewUser};
use crate::error::{ApiError, ApiResult};
use crate::models::users::{ChangePassword, CreateUser, Roles, UpdateUser, UserResponse};

const EMAIL_TAKEN: &str = "Cet email est déjà utilisé";

/// GET /api/users: list all users (admin).
pub async fn get_users(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let users = user_db::get_all_users(db.get_ref()).await?;
    let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/users/{id}: one user, for itself or an admin.
pub async fn get_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    ensure_self_or_admin(&user.0, id)?;

    let found = user_db::get_user_by_id(db.get_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Utilisateur"))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(found)))
}

/// POST /api/users: create an account (admin). Role defaults to client.
pub async fn create_user(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateUser>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    let email = body.email.trim().to_string();
    if user_db::email_taken(db.get_ref(), &email, None).await? {
        return Err(ApiError::BadRequest(EMAIL_TAKEN.into()));
    }

    let created = user_db::insert_user(
        db.get_ref(),
        NewUser {
            name: body.name.trim().to_string(),
            email,
            password: hash_password(&body.password)?,
            role: body.role.unwrap_or(Roles::Client),
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(created)))
}

/// PUT /api/users/{id}: update name and/or email.
pub async fn update_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUser>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    ensure_self_or_admin(&user.0, id)?;

    let body = body.into_inner();
    body.validate()?;

    let target = user_db::get_user_by_id(db.get_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Utilisateur"))?;

    let email = body.email.map(|e| e.trim().to_string());
    if let Some(email) = &email {
        if user_db::email_taken(db.get_ref(), email, Some(id)).await? {
            return Err(ApiError::BadRequest(EMAIL_TAKEN.into()));
        }
    }

    let name = body.name.map(|n| n.trim().to_string());
    let updated = user_db::update_profile(db.get_ref(), target, name, email).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// DELETE /api/users/{id}: delete an account (admin), returning it.
pub async fn delete_user(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    let target = user_db::get_user_by_id(db.get_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Utilisateur"))?;
    user_db::delete_user(db.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(target)))
}

/// PUT /api/password/{id}: change a password.
///
/// Clients must prove the current password; admins may reset without it.
pub async fn change_password(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ChangePassword>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    ensure_self_or_admin(&user.0, id)?;

    let body = body.into_inner();
    body.validate()?;

    let target = user_db::get_user_by_id(db.get_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Utilisateur"))?;

    if !user.0.is_admin() {
        let current = body.current_password.as_deref().unwrap_or_default();
        let verified = verify_password(current, &target.password).unwrap_or_else(|e| {
            tracing::warn!(user_id = %target.id, error = %e, "unreadable password hash");
            Verified::No
        });
        if !verified.is_ok() {
            return Err(ApiError::Unauthorized("Mot de passe actuel incorrect"));
        }
    }

    user_db::set_password(db.get_ref(), target, hash_password(&body.new_password)?).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Mot de passe mis à jour",
    })))
}
