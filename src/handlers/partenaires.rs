use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::db::partenaires as partenaire_db;
use crate::error::{ApiError, ApiResult};
use crate::geolocation::{GeoLocator, parse_client_ip};
use crate::models::partenaires::CreatePartenaire;

/// GET /api/partenaire: partner countries, public.
pub async fn get_partenaires(db: web::Data<DatabaseConnection>) -> ApiResult<HttpResponse> {
    let partenaires = partenaire_db::get_all_partenaires(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(partenaires))
}

/// POST /api/partenaire: register a partner country (admin).
pub async fn create_partenaire(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreatePartenaire>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;

    if partenaire_db::partenaire_exists(db.get_ref(), &body.code, &body.name).await? {
        return Err(ApiError::Conflict("Ce pays est déjà partenaire".into()));
    }

    let partenaire = partenaire_db::insert_partenaire(db.get_ref(), &body.code, &body.name).await?;
    Ok(HttpResponse::Created().json(partenaire))
}

/// DELETE /api/partenaire/{code}: returns the removed row (admin).
pub async fn delete_partenaire(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let code = path.into_inner();

    let partenaire = partenaire_db::get_partenaire(db.get_ref(), &code)
        .await?
        .ok_or(ApiError::NotFound("Pays partenaire"))?;
    partenaire_db::delete_partenaire(db.get_ref(), &partenaire.code).await?;

    Ok(HttpResponse::Ok().json(partenaire))
}

/// GET /api/geolocation: locate the caller and tell whether its country is a partner.
///
/// Lookup failures still answer 200 with `isPartner: false` and an `error`.
pub async fn geolocate(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    geo: web::Data<GeoLocator>,
) -> ApiResult<HttpResponse> {
    let ip = req
        .connection_info()
        .realip_remote_addr()
        .and_then(parse_client_ip);

    let country = match geo.lookup(ip).await {
        Ok(country) => country,
        Err(e) => {
            tracing::warn!(error = ?e, "geolocation lookup failed");
            return Ok(HttpResponse::Ok().json(serde_json::json!({
                "isPartner": false,
                "error": e.to_string(),
            })));
        }
    };

    let is_partner = partenaire_db::get_partenaire(db.get_ref(), &country.code)
        .await?
        .is_some();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "isPartner": is_partner,
        "country": country,
    })))
}
