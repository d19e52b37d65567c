use chrono::Duration;
use sea_orm::*;
use uuid::Uuid;

use crate::models::invoice_items;
use crate::models::invoices::{
    self, CreateInvoice, InvoiceStatus, InvoiceWithItems, PAYMENT_TERM_DAYS, UpdateInvoice,
};

/// Write an invoice and its lines on `db`. Pass a transaction.
pub(crate) async fn write_invoice<C: ConnectionTrait>(
    db: &C,
    input: &CreateInvoice,
) -> Result<InvoiceWithItems, DbErr> {
    let now = chrono::Utc::now();
    let status = input.status.unwrap_or(InvoiceStatus::Pending);

    let invoice = invoices::ActiveModel {
        id: Set(input.id.unwrap_or_else(Uuid::new_v4)),
        order_id: Set(input.order_id),
        customer_name: Set(input.customer_name.clone()),
        customer_email: Set(input.customer_email.clone()),
        date: Set(now),
        due_date: Set(now + Duration::days(PAYMENT_TERM_DAYS)),
        total_amount: Set(input.total()),
        status: Set(status),
        paid_at: Set((status == InvoiceStatus::Paid).then_some(now)),
        updated_at: Set(None),
    }
    .insert(db)
    .await?;

    let mut items = Vec::with_capacity(input.items.len());
    for line in &input.items {
        let item = invoice_items::ActiveModel {
            facture_id: Set(invoice.id),
            product: Set(line.product.clone()),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            total_price: Set(line.total()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        items.push(item);
    }

    Ok(InvoiceWithItems { invoice, items })
}

/// Create an invoice with its lines in one transaction.
pub async fn create_invoice(
    db: &DatabaseConnection,
    input: &CreateInvoice,
) -> Result<InvoiceWithItems, DbErr> {
    let txn = db.begin().await?;
    let created = write_invoice(&txn, input).await?;
    txn.commit().await?;

    Ok(created)
}

/// Fetch all invoices, newest first.
pub async fn get_all_invoices(db: &DatabaseConnection) -> Result<Vec<invoices::Model>, DbErr> {
    invoices::Entity::find()
        .order_by_desc(invoices::Column::Date)
        .all(db)
        .await
}

/// Fetch the invoices addressed to one customer email, newest first.
pub async fn get_invoices_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Vec<invoices::Model>, DbErr> {
    invoices::Entity::find()
        .filter(invoices::Column::CustomerEmail.eq(email))
        .order_by_desc(invoices::Column::Date)
        .all(db)
        .await
}

/// Fetch a single invoice by ID.
pub async fn get_invoice_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<invoices::Model>, DbErr> {
    invoices::Entity::find_by_id(id).one(db).await
}

/// Fetch an invoice together with its lines.
pub async fn get_invoice_with_items(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<InvoiceWithItems>, DbErr> {
    let Some(invoice) = get_invoice_by_id(db, id).await? else {
        return Ok(None);
    };
    let items = invoice.find_related(invoice_items::Entity).all(db).await?;

    Ok(Some(InvoiceWithItems { invoice, items }))
}

/// Apply a partial update. Moving to `paid` stamps `paid_at`, leaving it clears it.
pub async fn update_invoice(
    db: &DatabaseConnection,
    invoice: invoices::Model,
    input: UpdateInvoice,
) -> Result<invoices::Model, DbErr> {
    let now = chrono::Utc::now();
    let mut active: invoices::ActiveModel = invoice.clone().into();

    if let Some(total_amount) = input.total_amount {
        active.total_amount = Set(total_amount);
    }
    if let Some(status) = input.status {
        active.status = Set(status);
        active.paid_at = Set(paid_at_for(&invoice, status, now));
    }
    active.updated_at = Set(Some(now));

    active.update(db).await
}

/// Change only the status of an invoice.
pub async fn set_invoice_status(
    db: &DatabaseConnection,
    invoice: invoices::Model,
    status: InvoiceStatus,
) -> Result<invoices::Model, DbErr> {
    update_invoice(
        db,
        invoice,
        UpdateInvoice {
            total_amount: None,
            status: Some(status),
        },
    )
    .await
}

fn paid_at_for(
    invoice: &invoices::Model,
    status: InvoiceStatus,
    now: chrono::DateTime<chrono::Utc>,
) -> Option<chrono::DateTime<chrono::Utc>> {
    match status {
        InvoiceStatus::Paid => invoice.paid_at.or(Some(now)),
        InvoiceStatus::Pending => None,
    }
}

/// Delete an invoice and its lines in one transaction, returning what was removed.
pub async fn delete_invoice(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<InvoiceWithItems>, DbErr> {
    let txn = db.begin().await?;

    let Some(invoice) = invoices::Entity::find_by_id(id).one(&txn).await? else {
        return Ok(None);
    };
    let items = invoice.find_related(invoice_items::Entity).all(&txn).await?;

    invoice_items::Entity::delete_many()
        .filter(invoice_items::Column::FactureId.eq(id))
        .exec(&txn)
        .await?;
    invoices::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(Some(InvoiceWithItems { invoice, items }))
}

/// Fetch every invoice line.
pub async fn get_all_invoice_items(
    db: &DatabaseConnection,
) -> Result<Vec<invoice_items::Model>, DbErr> {
    invoice_items::Entity::find()
        .order_by_asc(invoice_items::Column::Id)
        .all(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(status: InvoiceStatus, paid_at: Option<chrono::DateTime<chrono::Utc>>) -> invoices::Model {
        let now = chrono::Utc::now();
        invoices::Model {
            id: Uuid::new_v4(),
            order_id: None,
            customer_name: "Jeanne".into(),
            customer_email: "jeanne@example.com".into(),
            date: now,
            due_date: now + Duration::days(PAYMENT_TERM_DAYS),
            total_amount: 42.0,
            status,
            paid_at,
            updated_at: None,
        }
    }

    #[test]
    fn paying_stamps_paid_at_once() {
        let now = chrono::Utc::now();
        let earlier = now - Duration::days(2);

        assert_eq!(
            paid_at_for(&invoice(InvoiceStatus::Pending, None), InvoiceStatus::Paid, now),
            Some(now)
        );
        assert_eq!(
            paid_at_for(&invoice(InvoiceStatus::Paid, Some(earlier)), InvoiceStatus::Paid, now),
            Some(earlier)
        );
    }

    #[test]
    fn back_to_pending_clears_paid_at() {
        let now = chrono::Utc::now();
        assert_eq!(
            paid_at_for(&invoice(InvoiceStatus::Paid, Some(now)), InvoiceStatus::Pending, now),
            None
        );
    }
}
