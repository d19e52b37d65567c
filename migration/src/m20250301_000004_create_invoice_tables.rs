use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Factures {
    Table,
    Id,
    OrderId,
    CustomerName,
    CustomerEmail,
    Date,
    DueDate,
    TotalAmount,
    Status,
    PaidAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FactureItems {
    Table,
    Id,
    FactureId,
    Product,
    Quantity,
    UnitPrice,
    TotalPrice,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Factures::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Factures::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Factures::OrderId).uuid().null())
                    .col(ColumnDef::new(Factures::CustomerName).string().not_null())
                    .col(ColumnDef::new(Factures::CustomerEmail).string().not_null())
                    .col(
                        ColumnDef::new(Factures::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Factures::DueDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Factures::TotalAmount).double().not_null())
                    .col(ColumnDef::new(Factures::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Factures::PaidAt).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Factures::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FactureItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FactureItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FactureItems::FactureId).uuid().not_null())
                    .col(ColumnDef::new(FactureItems::Product).string().not_null())
                    .col(ColumnDef::new(FactureItems::Quantity).integer().not_null())
                    .col(ColumnDef::new(FactureItems::UnitPrice).double().not_null())
                    .col(ColumnDef::new(FactureItems::TotalPrice).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_facture_items_facture_id")
                            .from(FactureItems::Table, FactureItems::FactureId)
                            .to(Factures::Table, Factures::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FactureItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Factures::Table).to_owned())
            .await
    }
}
