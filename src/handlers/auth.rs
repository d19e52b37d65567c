use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::jwt::JwtKeys;
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::password::{Verified, hash_password, verify_password};
use crate::db::settings as settings_db;
use crate::db::users::{self as user_db, NewUser};
use crate::error::{ApiError, ApiResult};
use crate::models::users::{AuthResponse, LoginRequest, RegisterUser, Roles, UserResponse};

/// POST /api/auth/login: exchange email and password for a token.
pub async fn login(
    db: web::Data<DatabaseConnection>,
    keys: web::Data<JwtKeys>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = body.into_inner();

    let user = user_db::get_user_by_email(db.get_ref(), email.trim())
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let verified = verify_password(&password, &user.password).unwrap_or_else(|e| {
        tracing::warn!(user_id = %user.id, error = %e, "unreadable password hash");
        Verified::No
    });
    if !verified.is_ok() {
        return Err(ApiError::InvalidCredentials);
    }

    if !user.is_admin() && settings_db::get_settings(db.get_ref()).await?.maintenance {
        return Err(ApiError::Maintenance);
    }

    let user = if verified == Verified::NeedsRehash {
        tracing::info!(user_id = %user.id, "upgrading plaintext password");
        user_db::set_password(db.get_ref(), user, hash_password(&password)?).await?
    } else {
        user
    };

    let token = keys.issue(&user).map_err(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: UserResponse::from(user),
        token,
    }))
}

/// POST /api/auth/register: create a client account and log it in.
pub async fn register(
    db: web::Data<DatabaseConnection>,
    keys: web::Data<JwtKeys>,
    body: web::Json<RegisterUser>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    if !settings_db::get_settings(db.get_ref()).await?.registration {
        return Err(ApiError::Forbidden("Les inscriptions sont fermées"));
    }

    let email = body.email.trim().to_string();
    if user_db::email_taken(db.get_ref(), &email, None).await? {
        return Err(ApiError::BadRequest("Cet email est déjà utilisé".into()));
    }

    let user = user_db::insert_user(
        db.get_ref(),
        NewUser {
            name: body.name.trim().to_string(),
            email,
            password: hash_password(&body.password)?,
            role: Roles::Client,
        },
    )
    .await?;
    tracing::info!(user_id = %user.id, "account registered");

    let token = keys.issue(&user).map_err(ApiError::Internal)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        user: UserResponse::from(user),
        token,
    }))
}

/// GET /api/auth/me: return the currently authenticated user's profile.
pub async fn me(user: AuthenticatedUser) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse::from(user.0)))
}
