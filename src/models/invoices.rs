use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of days between an invoice's date and its due date.
pub const PAYMENT_TERM_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// SeaORM entity for the `factures` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "factures")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub date: DateTimeUtc,
    pub due_date: DateTimeUtc,
    #[sea_orm(column_type = "Double")]
    pub total_amount: f64,
    pub status: InvoiceStatus,
    pub paid_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_items::Entity")]
    Items,
}

impl Related<super::invoice_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemInput {
    #[validate(length(min = 1, message = "Le produit est obligatoire"))]
    pub product: String,
    #[validate(range(min = 1, message = "La quantité doit être supérieure à zéro"))]
    pub quantity: i32,
    #[validate(range(min = 0.0, message = "Le prix doit être positif"))]
    pub unit_price: f64,
    /// Recomputed from `unit_price * quantity` when absent.
    pub total_price: Option<f64>,
}

impl InvoiceItemInput {
    pub fn total(&self) -> f64 {
        self.total_price
            .unwrap_or(self.unit_price * f64::from(self.quantity))
    }
}

/// Body of `POST /api/invoices`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoice {
    pub id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Le nom du client est obligatoire"))]
    pub customer_name: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub customer_email: String,
    /// Sum of the item totals when absent.
    pub total_amount: Option<f64>,
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<InvoiceItemInput>,
}

impl CreateInvoice {
    pub fn total(&self) -> f64 {
        self.total_amount
            .unwrap_or_else(|| self.items.iter().map(InvoiceItemInput::total).sum())
    }
}

/// Body of `PUT /api/invoices/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoice {
    #[validate(range(min = 0.0, message = "Le montant doit être positif"))]
    pub total_amount: Option<f64>,
    pub status: Option<InvoiceStatus>,
}

/// Body of `PATCH /api/invoices/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInvoiceStatus {
    pub status: InvoiceStatus,
}

/// An invoice together with its lines, as rendered by the client-side PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceWithItems {
    #[serde(flatten)]
    pub invoice: Model,
    pub items: Vec<super::invoice_items::Model>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(unit_price: f64, quantity: i32, total_price: Option<f64>) -> InvoiceItemInput {
        InvoiceItemInput {
            product: "Chablis".into(),
            quantity,
            unit_price,
            total_price,
        }
    }

    #[test]
    fn item_total_falls_back_to_unit_price_times_quantity() {
        assert!((item(9.5, 4, None).total() - 38.0).abs() < f64::EPSILON);
        assert!((item(9.5, 4, Some(30.0)).total() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invoice_total_defaults_to_sum_of_items() {
        let body = CreateInvoice {
            id: None,
            order_id: None,
            customer_name: "Jeanne".into(),
            customer_email: "jeanne@example.com".into(),
            total_amount: None,
            status: None,
            items: vec![item(10.0, 2, None), item(5.0, 1, None)],
        };

        assert!((body.total() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn create_invoice_accepts_camel_case_body() {
        let body: CreateInvoice = serde_json::from_value(serde_json::json!({
            "orderId": Uuid::new_v4(),
            "customerName": "Jeanne",
            "customerEmail": "jeanne@example.com",
            "totalAmount": 42.0,
            "status": "paid",
            "items": [{ "product": "Pomerol", "quantity": 2, "unitPrice": 21.0, "totalPrice": 42.0 }],
        }))
        .unwrap();

        assert_eq!(body.status, Some(InvoiceStatus::Paid));
        assert_eq!(body.items.len(), 1);
        assert!(body.validate().is_ok());
    }
}
