use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alerts::AlertId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alerts::UserId).integer().not_null())
                    .col(ColumnDef::new(Alerts::AlertType).string_len(16).not_null())
                    .col(ColumnDef::new(Alerts::Details).text().not_null())
                    .col(
                        ColumnDef::new(Alerts::Seen)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Alerts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Inbox lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_alerts_user_seen")
                    .table(Alerts::Table)
                    .col(Alerts::UserId)
                    .col(Alerts::Seen)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Alerts {
    Table,
    AlertId,
    UserId,
    AlertType,
    Details,
    Seen,
    CreatedAt,
}
