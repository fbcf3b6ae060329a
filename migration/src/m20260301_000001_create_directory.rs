//! Driver and sponsor directory tables.
//!
//! Account management owns these rows; the ledger only reads them to resolve
//! caller scope and alert recipients.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sponsors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sponsors::SponsorId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sponsors::UserId).integer().not_null().unique_key())
                    .col(ColumnDef::new(Sponsors::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Drivers::DriverId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Drivers::UserId).integer().not_null().unique_key())
                    .col(ColumnDef::new(Drivers::FirstName).string().not_null())
                    .col(ColumnDef::new(Drivers::LastName).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Drivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sponsors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Sponsors {
    Table,
    SponsorId,
    UserId,
    Name,
}

#[derive(DeriveIden)]
pub(crate) enum Drivers {
    Table,
    DriverId,
    UserId,
    FirstName,
    LastName,
}
