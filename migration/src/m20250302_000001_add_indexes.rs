use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Orders {
    Table,
    ClientId,
}

#[derive(DeriveIden)]
enum OrderItems {
    Table,
    OrderId,
}

#[derive(DeriveIden)]
enum Factures {
    Table,
    CustomerEmail,
}

#[derive(DeriveIden)]
enum AdminMessages {
    Table,
    Status,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Orders are listed per client on the client dashboard
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_client_id")
                    .table(Orders::Table)
                    .col(Orders::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_items_order_id")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .to_owned(),
            )
            .await?;

        // Invoice ownership is checked by customer email
        manager
            .create_index(
                Index::create()
                    .name("idx_factures_customer_email")
                    .table(Factures::Table)
                    .col(Factures::CustomerEmail)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_messages_status")
                    .table(AdminMessages::Table)
                    .col(AdminMessages::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_orders_client_id")
                    .table(Orders::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_order_items_order_id")
                    .table(OrderItems::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_factures_customer_email")
                    .table(Factures::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_admin_messages_status")
                    .table(AdminMessages::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
