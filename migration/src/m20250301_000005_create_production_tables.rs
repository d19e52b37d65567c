use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Productions {
    Table,
    Id,
    Name,
    Status,
    StartDate,
    EndDate,
    Description,
    Progress,
    CurrentStep,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProductionSteps {
    Table,
    Id,
    ProductionId,
    Name,
    Status,
    StartDate,
    EndDate,
    Duration,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Productions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Productions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Productions::Name).string().not_null())
                    .col(ColumnDef::new(Productions::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Productions::StartDate).date().null())
                    .col(ColumnDef::new(Productions::EndDate).date().null())
                    .col(ColumnDef::new(Productions::Description).text().null())
                    .col(
                        ColumnDef::new(Productions::Progress)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Productions::CurrentStep).string().not_null())
                    .col(
                        ColumnDef::new(Productions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Productions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductionSteps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductionSteps::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductionSteps::ProductionId).uuid().not_null())
                    .col(ColumnDef::new(ProductionSteps::Name).string().not_null())
                    .col(ColumnDef::new(ProductionSteps::Status).string_len(16).not_null())
                    .col(ColumnDef::new(ProductionSteps::StartDate).date().null())
                    .col(ColumnDef::new(ProductionSteps::EndDate).date().null())
                    .col(ColumnDef::new(ProductionSteps::Duration).integer().null())
                    .col(
                        ColumnDef::new(ProductionSteps::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionSteps::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_production_steps_production_id")
                            .from(ProductionSteps::Table, ProductionSteps::ProductionId)
                            .to(Productions::Table, Productions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductionSteps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Productions::Table).to_owned())
            .await
    }
}
