use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Cuvees {
    Table,
    Id,
    Nom,
    Annee,
    Type,
    Cepage,
    Description,
    Prix,
    Stock,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Stocks {
    Table,
    Id,
    CuveeId,
    Quantite,
    Emplacement,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Vignobles {
    Table,
    Id,
    Nom,
    Localisation,
    Superficie,
    Cepages,
    Description,
    Image,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cuvees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cuvees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cuvees::Nom).string().not_null())
                    .col(ColumnDef::new(Cuvees::Annee).integer().not_null())
                    .col(ColumnDef::new(Cuvees::Type).string().not_null())
                    .col(ColumnDef::new(Cuvees::Cepage).string().not_null())
                    .col(ColumnDef::new(Cuvees::Description).text().null())
                    .col(ColumnDef::new(Cuvees::Prix).double().not_null())
                    .col(ColumnDef::new(Cuvees::Stock).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Cuvees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Cuvees::UpdatedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        // Stock rows are per location; deleting a cuvée removes its rows.
        manager
            .create_table(
                Table::create()
                    .table(Stocks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stocks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Stocks::CuveeId).uuid().not_null())
                    .col(ColumnDef::new(Stocks::Quantite).integer().not_null())
                    .col(ColumnDef::new(Stocks::Emplacement).string().not_null())
                    .col(
                        ColumnDef::new(Stocks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Stocks::UpdatedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stocks_cuvee_id")
                            .from(Stocks::Table, Stocks::CuveeId)
                            .to(Cuvees::Table, Cuvees::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vignobles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vignobles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vignobles::Nom).string().not_null())
                    .col(ColumnDef::new(Vignobles::Localisation).string().not_null())
                    .col(ColumnDef::new(Vignobles::Superficie).double().not_null())
                    .col(ColumnDef::new(Vignobles::Cepages).json().not_null())
                    .col(ColumnDef::new(Vignobles::Description).text().null())
                    .col(ColumnDef::new(Vignobles::Image).string().null())
                    .col(
                        ColumnDef::new(Vignobles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vignobles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vignobles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stocks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cuvees::Table).to_owned())
            .await
    }
}
