use actix_web::FromRequest;
use actix_web::{HttpRequest, dev::Payload, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt::JwtKeys;
use crate::db::users::get_user_by_id;
use crate::error::ApiError;
use crate::models::users;

/// The user behind a valid bearer token.
pub struct AuthenticatedUser(pub users::Model);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let bearer = BearerAuth::extract(&req)
                .await
                .map_err(|_| ApiError::Unauthorized("Token manquant"))?;

            // 2. Validate the JWT with the shared keys.
            let keys = req
                .app_data::<web::Data<JwtKeys>>()
                .ok_or_else(|| ApiError::Internal("JWT keys not configured".into()))?;

            let claims = keys.validate_token(bearer.token()).map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                ApiError::Unauthorized("Token invalide")
            })?;

            let user_id = claims
                .user_id()
                .map_err(|_| ApiError::Unauthorized("Token invalide"))?;

            // 3. The account must still exist.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| ApiError::Internal("Database not configured".into()))?;

            let user = get_user_by_id(db.get_ref(), user_id)
                .await?
                .ok_or(ApiError::Unauthorized("Token invalide"))?;

            Ok(AuthenticatedUser(user))
        })
    }
}

/// An authenticated user with the admin role; anyone else gets 403.
pub struct AdminUser(pub users::Model);

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = AuthenticatedUser::from_request(req, payload);

        Box::pin(async move {
            let AuthenticatedUser(user) = user.await?;
            if !user.is_admin() {
                return Err(ApiError::Forbidden("Accès réservé aux administrateurs"));
            }
            Ok(AdminUser(user))
        })
    }
}
