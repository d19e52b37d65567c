use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use validator::ValidationErrors;

use crate::auth::password::PasswordError;
use crate::db::orders::OrderError;

/// Every failure a handler can answer with.
///
/// Messages are French because the SPA shows them to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} introuvable")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("Données invalides")]
    Validation(#[from] ValidationErrors),
    #[error("Email ou mot de passe incorrect")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("Le site est en maintenance")]
    Maintenance,
    #[error("Erreur interne du serveur")]
    Database(#[from] DbErr),
    #[error("Erreur interne du serveur")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Maintenance => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Database(e) => tracing::error!(error = %e, "database error"),
            Self::Internal(e) => tracing::error!(error = %e, "internal error"),
            _ => {}
        }

        let body = match self {
            Self::Validation(errors) => serde_json::json!({
                "message": self.to_string(),
                "errors": errors,
            }),
            _ => serde_json::json!({ "message": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::OutOfStock(_) => Self::Conflict(e.to_string()),
            OrderError::UnknownCuvee(_) => Self::NotFound("Cuvée"),
            OrderError::Db(e) => Self::Database(e),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        Self::Internal(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
