//! Database migrations for tenant settings

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250301_000001_create_settings::Migration)]
    }
}

mod m20250301_000001_create_settings {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Settings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Settings::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Settings::Name).string_len(191).not_null())
                        .col(
                            ColumnDef::new(Settings::Group)
                                .string_len(100)
                                .not_null()
                                .default("default"),
                        )
                        .col(ColumnDef::new(Settings::Namespace).string_len(100).null())
                        .col(ColumnDef::new(Settings::Value).text().not_null())
                        .col(
                            ColumnDef::new(Settings::Type)
                                .string_len(20)
                                .not_null()
                                .default("string"),
                        )
                        .col(ColumnDef::new(Settings::TenantType).string_len(191).null())
                        .col(ColumnDef::new(Settings::TenantId).string_len(191).null())
                        .col(
                            ColumnDef::new(Settings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Settings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_settings_unique")
                        .table(Settings::Table)
                        .col(Settings::Name)
                        .col(Settings::Group)
                        .col(Settings::Namespace)
                        .col(Settings::TenantType)
                        .col(Settings::TenantId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_settings_tenant")
                        .table(Settings::Table)
                        .col(Settings::TenantType)
                        .col(Settings::TenantId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Settings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Settings {
        Table,
        Id,
        Name,
        Group,
        Namespace,
        Value,
        Type,
        TenantType,
        TenantId,
        CreatedAt,
        UpdatedAt,
    }
}
