use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Partenaire {
    Table,
    Code,
    Name,
}

#[derive(DeriveIden)]
enum Settings {
    Table,
    Id,
    Maintenance,
    Registration,
}

#[derive(DeriveIden)]
enum UserSettings {
    Table,
    UserId,
    Settings,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AdminMessages {
    Table,
    Id,
    UserId,
    Email,
    Message,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Partenaire::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Partenaire::Code)
                            .string_len(8)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Partenaire::Name).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Settings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Settings::Id).integer().not_null().primary_key())
                    .col(
                        ColumnDef::new(Settings::Maintenance)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Settings::Registration)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // The settings table holds exactly one row.
        let seed = Query::insert()
            .into_table(Settings::Table)
            .columns([Settings::Id, Settings::Maintenance, Settings::Registration])
            .values_panic([1.into(), false.into(), true.into()])
            .to_owned();
        manager.exec_stmt(seed).await?;

        manager
            .create_table(
                Table::create()
                    .table(UserSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserSettings::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserSettings::Settings).json().not_null())
                    .col(
                        ColumnDef::new(UserSettings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_settings_user_id")
                            .from(UserSettings::Table, UserSettings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Messages survive their author: `user_id` is nulled, not cascaded.
        manager
            .create_table(
                Table::create()
                    .table(AdminMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminMessages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminMessages::UserId).uuid().null())
                    .col(ColumnDef::new(AdminMessages::Email).string().not_null())
                    .col(ColumnDef::new(AdminMessages::Message).text().not_null())
                    .col(
                        ColumnDef::new(AdminMessages::Status)
                            .string_len(8)
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(AdminMessages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminMessages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admin_messages_user_id")
                            .from(AdminMessages::Table, AdminMessages::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminMessages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Settings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Partenaire::Table).to_owned())
            .await
    }
}
