//! Append-only ledger audit tables: per-item purchase transactions and the
//! balance change log.

use sea_orm_migration::prelude::*;

use crate::m20260301_000002_create_driver_sponsor::DriverSponsor;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::TransactionId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).integer().not_null())
                    // Points, negative for spend
                    .col(ColumnDef::new(Transactions::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Transactions::ItemId).string().not_null())
                    .col(ColumnDef::new(Transactions::DriverSponsorId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_driver_sponsor_id")
                            .from(Transactions::Table, Transactions::DriverSponsorId)
                            .to(DriverSponsor::Table, DriverSponsor::DriverSponsorId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DriverBalanceChanges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DriverBalanceChanges::BalanceChangeId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DriverBalanceChanges::DriverId).integer().not_null())
                    .col(ColumnDef::new(DriverBalanceChanges::SponsorId).integer().not_null())
                    .col(ColumnDef::new(DriverBalanceChanges::Reason).string().not_null())
                    .col(
                        ColumnDef::new(DriverBalanceChanges::PointsChange)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverBalanceChanges::BalanceAfter)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DriverBalanceChanges::ActorId).integer())
                    .col(
                        ColumnDef::new(DriverBalanceChanges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_driver_sponsor_date")
                    .table(Transactions::Table)
                    .col(Transactions::DriverSponsorId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_balance_changes_sponsor_driver")
                    .table(DriverBalanceChanges::Table)
                    .col(DriverBalanceChanges::SponsorId)
                    .col(DriverBalanceChanges::DriverId)
                    .col(DriverBalanceChanges::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DriverBalanceChanges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    TransactionId,
    Date,
    UserId,
    Amount,
    ItemId,
    DriverSponsorId,
}

#[derive(DeriveIden)]
enum DriverBalanceChanges {
    Table,
    BalanceChangeId,
    DriverId,
    SponsorId,
    Reason,
    PointsChange,
    BalanceAfter,
    ActorId,
    CreatedAt,
}
