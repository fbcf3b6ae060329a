//! Driver/sponsor enrollment links and their point balances

use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_directory::{Drivers, Sponsors};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DriverSponsor::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DriverSponsor::DriverSponsorId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DriverSponsor::DriverId).integer().not_null())
                    .col(ColumnDef::new(DriverSponsor::SponsorId).integer().not_null())
                    // Points (1 point = $0.01)
                    .col(
                        ColumnDef::new(DriverSponsor::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DriverSponsor::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(DriverSponsor::SinceAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(DriverSponsor::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_sponsor_driver_id")
                            .from(DriverSponsor::Table, DriverSponsor::DriverId)
                            .to(Drivers::Table, Drivers::DriverId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_sponsor_sponsor_id")
                            .from(DriverSponsor::Table, DriverSponsor::SponsorId)
                            .to(Sponsors::Table, Sponsors::SponsorId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One link per driver/sponsor pair
        manager
            .create_index(
                Index::create()
                    .name("idx_driver_sponsor_pair")
                    .table(DriverSponsor::Table)
                    .col(DriverSponsor::DriverId)
                    .col(DriverSponsor::SponsorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_driver_sponsor_sponsor_status")
                    .table(DriverSponsor::Table)
                    .col(DriverSponsor::SponsorId)
                    .col(DriverSponsor::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DriverSponsor::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum DriverSponsor {
    Table,
    DriverSponsorId,
    DriverId,
    SponsorId,
    Balance,
    Status,
    SinceAt,
    CreatedAt,
}
