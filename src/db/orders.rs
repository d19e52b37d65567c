use sea_orm::*;
use serde::Serialize;
use uuid::Uuid;

use crate::db::cuvees as cuvee_db;
use crate::db::invoices as invoice_db;
use crate::models::invoices::{self, CreateInvoice, InvoiceItemInput, InvoiceStatus};
use crate::models::order_items::{self, CreateOrderItem};
use crate::models::orders::{self, CreateOrder, OrderStatus, PricedLine, order_totals};

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Stock insuffisant pour {0}")]
    OutOfStock(String),
    #[error("Cuvée introuvable")]
    UnknownCuvee(Uuid),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// An order and the lines written with it.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedOrder {
    #[serde(flatten)]
    pub order: orders::Model,
    pub items: Vec<order_items::Model>,
}

/// Result of a checkout: the order, its lines and the invoice issued for it.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub order: orders::Model,
    pub items: Vec<order_items::Model>,
    pub invoice: invoices::InvoiceWithItems,
}

/// Write an order, its lines and the matching stock decrements on `db`.
///
/// Each line is priced from the cuvée row, never from the request.
/// Callers pass a transaction: a short or unknown cuvée aborts halfway through.
async fn write_order<C: ConnectionTrait>(
    db: &C,
    input: &CreateOrder,
) -> Result<PlacedOrder, OrderError> {
    let mut lines = Vec::with_capacity(input.items.len());
    for line in &input.items {
        let cuvee = cuvee_db::get_cuvee_by_id(db, line.id)
            .await?
            .ok_or(OrderError::UnknownCuvee(line.id))?;

        if !cuvee_db::decrement_stock(db, cuvee.id, line.quantity).await? {
            return Err(OrderError::OutOfStock(cuvee.nom));
        }

        lines.push(PricedLine {
            cuvee_id: cuvee.id,
            name: cuvee.nom,
            unit_price: cuvee.prix,
            quantity: line.quantity,
        });
    }

    let (total, quantity) = order_totals(&lines);
    let order = orders::ActiveModel {
        id: Set(input.id.unwrap_or_else(Uuid::new_v4)),
        client_id: Set(input.client_id),
        client_name: Set(input.client_name.clone()),
        total: Set(total),
        date: Set(chrono::Utc::now()),
        status: Set(input.status.unwrap_or(OrderStatus::Pending)),
        shipping_address: Set(input.shipping_address.clone()),
        country: Set(input.country.trim().to_uppercase()),
        quantity: Set(quantity),
        updated_at: Set(None),
    }
    .insert(db)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let item = order_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(line.name),
            price: Set(line.unit_price),
            quantity: Set(line.quantity),
            order_id: Set(order.id),
            client_id: Set(order.client_id),
            cuvee_id: Set(Some(line.cuvee_id)),
        }
        .insert(db)
        .await?;
        items.push(item);
    }

    Ok(PlacedOrder { order, items })
}

/// Place an order atomically: order row, lines and stock decrements commit together.
pub async fn place_order(
    db: &DatabaseConnection,
    input: &CreateOrder,
) -> Result<PlacedOrder, OrderError> {
    let txn = db.begin().await?;
    let placed = write_order(&txn, input).await?;
    txn.commit().await?;

    Ok(placed)
}

/// Place an order and issue its invoice in a single transaction.
pub async fn checkout(
    db: &DatabaseConnection,
    input: &CreateOrder,
    customer_email: &str,
) -> Result<CheckoutReceipt, OrderError> {
    let txn = db.begin().await?;
    let placed = write_order(&txn, input).await?;

    let invoice_input = CreateInvoice {
        id: None,
        order_id: Some(placed.order.id),
        customer_name: placed.order.client_name.clone(),
        customer_email: customer_email.to_string(),
        total_amount: Some(placed.order.total),
        status: Some(InvoiceStatus::Pending),
        items: placed
            .items
            .iter()
            .map(|item| InvoiceItemInput {
                product: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.price,
                total_price: None,
            })
            .collect(),
    };
    let invoice = invoice_db::write_invoice(&txn, &invoice_input).await?;

    txn.commit().await?;

    Ok(CheckoutReceipt {
        order: placed.order,
        items: placed.items,
        invoice,
    })
}

/// Fetch all orders, newest first.
pub async fn get_all_orders(db: &DatabaseConnection) -> Result<Vec<orders::Model>, DbErr> {
    orders::Entity::find()
        .order_by_desc(orders::Column::Date)
        .all(db)
        .await
}

/// Fetch the orders of one client, newest first.
pub async fn get_orders_by_client(
    db: &DatabaseConnection,
    client_id: Uuid,
) -> Result<Vec<orders::Model>, DbErr> {
    orders::Entity::find()
        .filter(orders::Column::ClientId.eq(client_id))
        .order_by_desc(orders::Column::Date)
        .all(db)
        .await
}

/// Fetch a single order by ID.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<orders::Model>, DbErr> {
    orders::Entity::find_by_id(id).one(db).await
}

/// Change the status of an order.
pub async fn update_order_status(
    db: &DatabaseConnection,
    order: orders::Model,
    status: OrderStatus,
) -> Result<orders::Model, DbErr> {
    let mut active: orders::ActiveModel = order.into();
    active.status = Set(status);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete an order and its lines in one transaction.
pub async fn delete_order(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    let txn = db.begin().await?;

    order_items::Entity::delete_many()
        .filter(order_items::Column::OrderId.eq(id))
        .exec(&txn)
        .await?;
    let result = orders::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(result)
}

/// Fetch every order line.
pub async fn get_all_order_items(
    db: &DatabaseConnection,
) -> Result<Vec<order_items::Model>, DbErr> {
    order_items::Entity::find().all(db).await
}

/// Fetch the lines of one order.
pub async fn get_items_by_order(
    db: &DatabaseConnection,
    order_id: Uuid,
) -> Result<Vec<order_items::Model>, DbErr> {
    order_items::Entity::find()
        .filter(order_items::Column::OrderId.eq(order_id))
        .all(db)
        .await
}

/// Append one line to an existing order. Stock is left untouched.
pub async fn insert_order_item(
    db: &DatabaseConnection,
    client_id: Uuid,
    order_id: Uuid,
    input: CreateOrderItem,
) -> Result<order_items::Model, DbErr> {
    let new_item = order_items::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        price: Set(input.price),
        quantity: Set(input.quantity),
        order_id: Set(order_id),
        client_id: Set(client_id),
        cuvee_id: Set(input.id),
    };

    new_item.insert(db).await
}
