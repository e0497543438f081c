use sea_orm_migration::prelude::*;

use crate::db::JobtrakrLog;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobtrakrLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobtrakrLog::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobtrakrLog::LoggedAt).text().not_null())
                    .col(ColumnDef::new(JobtrakrLog::Message).text().not_null())
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobtrakrLog::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
