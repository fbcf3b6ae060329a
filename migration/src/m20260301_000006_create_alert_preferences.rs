use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per user; a missing row means every toggle is on
        manager
            .create_table(
                Table::create()
                    .table(AlertPreferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlertPreferences::UserId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AlertPreferences::PointsAlert)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AlertPreferences::OrderAlert)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AlertPreferences::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlertPreferences::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AlertPreferences {
    Table,
    UserId,
    PointsAlert,
    OrderAlert,
    UpdatedAt,
}
