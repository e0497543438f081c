use sea_orm_migration::prelude::*;

use crate::allocator::id_table_statement;
use crate::db::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The id generator table comes first: every entity insert depends on it.
        manager.create_table(id_table_statement()).await?;

        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(unique_id_col(Jobs::Id))
                    .col(ColumnDef::new(Jobs::Code).text())
                    .col(ColumnDef::new(Jobs::Name).text())
                    .col(ColumnDef::new(Jobs::JobTypeId).big_integer())
                    .col(ColumnDef::new(Jobs::CustomerId).big_integer().not_null())
                    .col(ColumnDef::new(Jobs::JobLocation).text())
                    .col(ColumnDef::new(Jobs::StartDate).text())
                    .col(ColumnDef::new(Jobs::PlannedFinish).text())
                    .col(ColumnDef::new(Jobs::BidPrice).double())
                    .col(ColumnDef::new(Jobs::Longitude).double())
                    .col(ColumnDef::new(Jobs::Latitude).double())
                    .col(ColumnDef::new(Jobs::Radius).double())
                    .col(ColumnDef::new(Jobs::JobStatus).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(unique_id_col(Categories::Id))
                    .col(ColumnDef::new(Categories::JobId).big_integer())
                    .col(ColumnDef::new(Categories::Code).text())
                    .col(ColumnDef::new(Categories::CategoryName).text())
                    .col(ColumnDef::new(Categories::StartDate).text())
                    .col(ColumnDef::new(Categories::EstPrice).double())
                    .col(ColumnDef::new(Categories::CategoryStatus).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(unique_id_col(Items::Id))
                    .col(ColumnDef::new(Items::CategoryId).big_integer())
                    .col(ColumnDef::new(Items::Code).text())
                    .col(ColumnDef::new(Items::ItemName).text())
                    .col(ColumnDef::new(Items::EstPrice).double())
                    .col(ColumnDef::new(Items::ItemStatus).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PictureBucket::Table)
                    .if_not_exists()
                    .col(unique_id_col(PictureBucket::Id))
                    .col(ColumnDef::new(PictureBucket::CustomerId).big_integer())
                    .col(ColumnDef::new(PictureBucket::JobId).big_integer())
                    .col(ColumnDef::new(PictureBucket::DeviceId).big_integer())
                    .col(ColumnDef::new(PictureBucket::FolderName).text())
                    .col(ColumnDef::new(PictureBucket::PictureName).text())
                    .col(ColumnDef::new(PictureBucket::DateAdded).text())
                    .col(ColumnDef::new(PictureBucket::PictureDate).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReceiptBucket::Table)
                    .if_not_exists()
                    .col(unique_id_col(ReceiptBucket::Id))
                    .col(ColumnDef::new(ReceiptBucket::UserId).big_integer())
                    .col(ColumnDef::new(ReceiptBucket::JobId).big_integer())
                    .col(ColumnDef::new(ReceiptBucket::DeviceId).big_integer())
                    .col(ColumnDef::new(ReceiptBucket::Amount).double())
                    .col(ColumnDef::new(ReceiptBucket::Vendor).text())
                    .col(ColumnDef::new(ReceiptBucket::Description).text())
                    .col(ColumnDef::new(ReceiptBucket::Notes).text())
                    .col(ColumnDef::new(ReceiptBucket::CategoryId).big_integer())
                    .col(ColumnDef::new(ReceiptBucket::ItemId).big_integer())
                    .col(ColumnDef::new(ReceiptBucket::AssetId).text())
                    .col(ColumnDef::new(ReceiptBucket::AlbumId).text())
                    .col(ColumnDef::new(ReceiptBucket::PictureUri).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Devices::Table)
                    .if_not_exists()
                    .col(unique_id_col(Devices::Id))
                    .col(ColumnDef::new(Devices::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Devices::Name).text())
                    .col(ColumnDef::new(Devices::DeviceId).text())
                    .col(ColumnDef::new(Devices::DeviceType).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(unique_id_col(Vendors::Id))
                    .col(ColumnDef::new(Vendors::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Vendors::VendorName).text())
                    .col(ColumnDef::new(Vendors::Address).text())
                    .col(ColumnDef::new(Vendors::Address2).text())
                    .col(ColumnDef::new(Vendors::City).text())
                    .col(ColumnDef::new(Vendors::State).text())
                    .col(ColumnDef::new(Vendors::Zip).text())
                    .col(ColumnDef::new(Vendors::MobilePhone).text())
                    .col(ColumnDef::new(Vendors::BusinessPhone).text())
                    .col(ColumnDef::new(Vendors::Notes).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Todos::Table)
                    .if_not_exists()
                    .col(unique_id_col(Todos::Id))
                    .col(ColumnDef::new(Todos::JobId).big_integer())
                    .col(ColumnDef::new(Todos::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Todos::Todo).text())
                    .col(ColumnDef::new(Todos::Completed).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_devices_device_id")
                    .table(Devices::Table)
                    .col(Devices::DeviceId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Todos::Table.into_table_ref(),
            Vendors::Table.into_table_ref(),
            Devices::Table.into_table_ref(),
            ReceiptBucket::Table.into_table_ref(),
            PictureBucket::Table.into_table_ref(),
            Items::Table.into_table_ref(),
            Categories::Table.into_table_ref(),
            Jobs::Table.into_table_ref(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        // The id generator table is never dropped: its counter must not restart.
        Ok(())
    }
}

fn unique_id_col(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .to_owned()
}
