use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

/// SeaORM entity for the `orders` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    #[sea_orm(column_type = "Double")]
    pub total: f64,
    pub date: DateTimeUtc,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub country: String,
    pub quantity: i32,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// One cart line. `id` is the cuvée being ordered.
///
/// Name and price sent by the client are ignored: lines are priced from the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLine {
    pub id: Uuid,
    #[validate(range(min = 1, message = "La quantité doit être supérieure à zéro"))]
    pub quantity: i32,
}

/// A cart line once its cuvée has been read back from the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub cuvee_id: Uuid,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i32,
}

impl PricedLine {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Body of `POST /api/orders`. Totals sent by older clients are ignored,
/// and so is `status` unless an admin places the order.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub id: Option<Uuid>,
    pub client_id: Uuid,
    #[validate(length(min = 1, message = "Le nom du client est obligatoire"))]
    pub client_name: String,
    pub status: Option<OrderStatus>,
    #[validate(length(min = 1, message = "L'adresse de livraison est obligatoire"))]
    pub shipping_address: String,
    #[validate(length(min = 2, max = 8, message = "Code pays invalide"))]
    pub country: String,
    #[validate(
        length(min = 1, message = "La commande doit contenir au moins un article"),
        nested
    )]
    pub items: Vec<OrderLine>,
}

/// Body of `POST /api/checkout`: an order plus the invoice recipient.
///
/// Clients always invoice their own account; only admins may pick `customerEmail`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    #[serde(flatten)]
    #[validate(nested)]
    pub order: CreateOrder,
    #[validate(email(message = "Adresse email invalide"))]
    pub customer_email: Option<String>,
}

/// Body of `PUT /api/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatus {
    pub id: Uuid,
    pub status: OrderStatus,
}

/// Total amount and bottle count of a priced cart.
pub fn order_totals(lines: &[PricedLine]) -> (f64, i32) {
    lines.iter().fold((0.0, 0), |(total, quantity), line| {
        (total + line.line_total(), quantity + line.quantity)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(unit_price: f64, quantity: i32) -> PricedLine {
        PricedLine {
            cuvee_id: Uuid::new_v4(),
            name: "Cuvée".to_string(),
            unit_price,
            quantity,
        }
    }

    #[test]
    fn totals_sum_price_times_quantity() {
        let (total, quantity) = order_totals(&[priced(12.5, 2), priced(30.0, 1)]);
        assert!((total - 55.0).abs() < f64::EPSILON);
        assert_eq!(quantity, 3);
    }

    #[test]
    fn totals_of_empty_cart_are_zero() {
        assert_eq!(order_totals(&[]), (0.0, 0));
    }

    #[test]
    fn create_order_requires_items() {
        let body: CreateOrder = serde_json::from_value(serde_json::json!({
            "clientId": Uuid::new_v4(),
            "clientName": "Jeanne",
            "shippingAddress": "1 rue des Vignes",
            "country": "FR",
            "items": [],
        }))
        .unwrap();

        assert!(body.validate().is_err());
    }

    #[test]
    fn create_order_rejects_zero_quantity_line() {
        let body = CreateOrder {
            id: None,
            client_id: Uuid::new_v4(),
            client_name: "Jeanne".into(),
            status: None,
            shipping_address: "1 rue des Vignes".into(),
            country: "FR".into(),
            items: vec![OrderLine { id: Uuid::new_v4(), quantity: 0 }],
        };

        assert!(body.validate().is_err());
    }

    #[test]
    fn checkout_flattens_order_fields() {
        let body: Checkout = serde_json::from_value(serde_json::json!({
            "clientId": Uuid::new_v4(),
            "clientName": "Jeanne",
            "shippingAddress": "1 rue des Vignes",
            "country": "fr",
            "customerEmail": "jeanne@example.com",
            "items": [{ "id": Uuid::new_v4(), "name": "Pomerol", "price": 20.0, "quantity": 2 }],
        }))
        .unwrap();

        assert_eq!(body.order.items.len(), 1);
        assert_eq!(body.order.items[0].quantity, 2);
        assert!(body.validate().is_ok());
    }

    #[test]
    fn checkout_email_is_optional_but_checked() {
        let mut body: Checkout = serde_json::from_value(serde_json::json!({
            "clientId": Uuid::new_v4(),
            "clientName": "Jeanne",
            "shippingAddress": "1 rue des Vignes",
            "country": "FR",
            "items": [{ "id": Uuid::new_v4(), "quantity": 1 }],
        }))
        .unwrap();
        assert!(body.customer_email.is_none());
        assert!(body.validate().is_ok());

        body.customer_email = Some("pas-un-email".into());
        assert!(body.validate().is_err());
    }

    #[test]
    fn status_round_trips_as_lowercase() {
        let status: OrderStatus = serde_json::from_value(serde_json::json!("shipped")).unwrap();
        assert_eq!(status, OrderStatus::Shipped);
    }
}
