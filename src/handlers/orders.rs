use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::ensure_self_or_admin;
use crate::auth::middleware::{AdminUser, AuthenticatedUser};
use crate::db::orders as order_db;
use crate::db::partenaires as partenaire_db;
use crate::db::users as user_db;
use crate::error::{ApiError, ApiResult};
use crate::models::order_items::CreateOrderItem;
use crate::models::orders::{Checkout, CreateOrder, UpdateOrderStatus};
use crate::models::users;

/// GET /api/orders: every order (admin).
pub async fn get_orders(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let orders = order_db::get_all_orders(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /api/orders/{client_id}: the orders of one client, `[]` when none.
pub async fn get_client_orders(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let client_id = path.into_inner();
    ensure_self_or_admin(&user.0, client_id)?;

    let orders = order_db::get_orders_by_client(db.get_ref(), client_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /api/orders/{id}/items: lines of one order, for its owner or an admin.
pub async fn get_items_of_order(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let order = order_db::get_order_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Commande"))?;
    ensure_self_or_admin(&user.0, order.client_id)?;

    let items = order_db::get_items_by_order(db.get_ref(), order.id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Clients order for themselves and always start at `pending`.
fn order_for_caller(user: &users::Model, mut order: CreateOrder) -> ApiResult<CreateOrder> {
    if user.is_admin() {
        return Ok(order);
    }
    if user.id != order.client_id {
        return Err(ApiError::Forbidden(
            "Vous ne pouvez commander que pour votre compte",
        ));
    }
    order.status = None;
    Ok(order)
}

/// POST /api/orders: place an order; lines and stock decrements commit together.
pub async fn create_order(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateOrder>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;
    let order = order_for_caller(&user.0, body)?;

    let placed = order_db::place_order(db.get_ref(), &order).await?;
    tracing::info!(
        order_id = %placed.order.id,
        client_id = %placed.order.client_id,
        total = placed.order.total,
        "order placed"
    );

    Ok(HttpResponse::Created().json(placed))
}

/// POST /api/checkout: order and invoice in one go, partner countries only.
pub async fn checkout(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<Checkout>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate()?;
    let order = order_for_caller(&user.0, body.order)?;

    if partenaire_db::get_partenaire(db.get_ref(), &order.country)
        .await?
        .is_none()
    {
        return Err(ApiError::Forbidden(
            "Les commandes sont réservées aux pays partenaires",
        ));
    }

    let customer_email = match body.customer_email {
        Some(email) if user.0.is_admin() => email.trim().to_string(),
        None if user.0.is_admin() => {
            user_db::get_user_by_id(db.get_ref(), order.client_id)
                .await?
                .ok_or(ApiError::NotFound("Client"))?
                .email
        }
        _ => user.0.email.clone(),
    };

    let receipt = order_db::checkout(db.get_ref(), &order, &customer_email).await?;
    tracing::info!(
        order_id = %receipt.order.id,
        invoice_id = %receipt.invoice.invoice.id,
        "checkout completed"
    );

    Ok(HttpResponse::Created().json(receipt))
}

/// PUT /api/orders: change the status of an order (admin).
pub async fn update_order_status(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateOrderStatus>,
) -> ApiResult<HttpResponse> {
    let UpdateOrderStatus { id, status } = body.into_inner();

    let order = order_db::get_order_by_id(db.get_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Commande"))?;
    let updated = order_db::update_order_status(db.get_ref(), order, status).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/orders/{id}: remove an order and its lines, returning the order (admin).
pub async fn delete_order(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    let order = order_db::get_order_by_id(db.get_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Commande"))?;
    order_db::delete_order(db.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(order))
}

// ── Order items ──

/// GET /api/order_items: every order line (admin).
pub async fn get_order_items(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let items = order_db::get_all_order_items(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/order_items/{client_id}/{order_id}: append a line to an order.
pub async fn create_order_item(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CreateOrderItem>,
) -> ApiResult<HttpResponse> {
    let (client_id, order_id) = path.into_inner();
    ensure_self_or_admin(&user.0, client_id)?;

    let body = body.into_inner();
    body.validate()?;

    let order = order_db::get_order_by_id(db.get_ref(), order_id)
        .await?
        .filter(|o| o.client_id == client_id)
        .ok_or(ApiError::NotFound("Commande"))?;

    let item = order_db::insert_order_item(db.get_ref(), order.client_id, order.id, body).await?;
    Ok(HttpResponse::Created().json(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::orders::{OrderLine, OrderStatus};
    use crate::models::users::Roles;

    fn user(role: Roles) -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            name: "Jeanne".into(),
            email: "jeanne@example.com".into(),
            password: String::new(),
            role,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    fn order(client_id: Uuid) -> CreateOrder {
        CreateOrder {
            id: None,
            client_id,
            client_name: "Jeanne".into(),
            status: Some(OrderStatus::Delivered),
            shipping_address: "1 rue des Vignes".into(),
            country: "FR".into(),
            items: vec![OrderLine {
                id: Uuid::new_v4(),
                quantity: 1,
            }],
        }
    }

    #[test]
    fn client_cannot_choose_order_status() {
        let client = user(Roles::Client);
        let placed = order_for_caller(&client, order(client.id)).unwrap();
        assert_eq!(placed.status, None);
    }

    #[test]
    fn client_cannot_order_for_someone_else() {
        let client = user(Roles::Client);
        assert!(matches!(
            order_for_caller(&client, order(Uuid::new_v4())),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn admin_keeps_requested_status() {
        let admin = user(Roles::Admin);
        let placed = order_for_caller(&admin, order(Uuid::new_v4())).unwrap();
        assert_eq!(placed.status, Some(OrderStatus::Delivered));
    }
}
