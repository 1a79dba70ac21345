use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Logs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Logs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Logs::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Logs::Owner).string().not_null())
                    .col(ColumnDef::new(Logs::Action).string().not_null())
                    .col(ColumnDef::new(Logs::Change).text().not_null())
                    .col(
                        ColumnDef::new(Logs::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_logs_user_id")
                    .table(Logs::Table)
                    .col(Logs::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Logs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Logs {
    Table,
    Id,
    UserId,
    Owner,
    Action,
    Change,
    Timestamp,
}
