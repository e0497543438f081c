use sea_orm::QueryResult;
use sea_orm::sea_query::{Expr, Order, Query, SelectStatement};

use super::{report_created, report_fetched, report_listing, report_status, require_id};
use crate::db::ReceiptBucket;
use crate::store::{TrakrStore, opt_id_value, read, read_id, read_opt_id};
use jobtrakr_core::{
    Created, DbStatus, Fetched, Listing, NamespaceId, ReceiptData, TrakrResult, UniqueId,
};

#[derive(Clone)]
pub struct ReceiptStore {
    store: TrakrStore,
    namespace: NamespaceId,
}

impl ReceiptStore {
    pub fn new(store: TrakrStore, namespace: NamespaceId) -> Self {
        Self { store, namespace }
    }

    /// Files a receipt under `job_id`. The owner is this store's namespace and the
    /// device is whichever one is registered on the store.
    pub async fn insert_receipt(&self, job_id: UniqueId, receipt: &ReceiptData) -> Created {
        let user_id = i64::from(self.namespace.as_u32());
        let device_id = opt_id_value(self.store.device_id());
        let result = self
            .store
            .create_row(self.namespace, |id| {
                Query::insert()
                    .into_table(ReceiptBucket::Table)
                    .columns([
                        ReceiptBucket::Id,
                        ReceiptBucket::UserId,
                        ReceiptBucket::JobId,
                        ReceiptBucket::DeviceId,
                        ReceiptBucket::Amount,
                        ReceiptBucket::Vendor,
                        ReceiptBucket::Description,
                        ReceiptBucket::Notes,
                        ReceiptBucket::CategoryId,
                        ReceiptBucket::ItemId,
                        ReceiptBucket::AssetId,
                        ReceiptBucket::AlbumId,
                        ReceiptBucket::PictureUri,
                    ])
                    .values_panic([
                        id.to_i64().into(),
                        user_id.into(),
                        job_id.to_i64().into(),
                        device_id.into(),
                        receipt.amount.into(),
                        receipt.vendor.clone().into(),
                        receipt.description.clone().into(),
                        receipt.notes.clone().into(),
                        opt_id_value(receipt.category_id).into(),
                        opt_id_value(receipt.item_id).into(),
                        receipt.asset_id.clone().into(),
                        receipt.album_id.clone().into(),
                        receipt.picture_uri.clone().into(),
                    ])
                    .to_owned()
            })
            .await;
        report_created("insert receipt", result)
    }

    pub async fn update_receipt(&self, receipt: &ReceiptData) -> DbStatus {
        report_status("update receipt", self.try_update(receipt).await)
    }

    async fn try_update(&self, receipt: &ReceiptData) -> TrakrResult<DbStatus> {
        let id = require_id(receipt.id, "receipt")?;
        let update = Query::update()
            .table(ReceiptBucket::Table)
            .values([
                (ReceiptBucket::Amount, receipt.amount.into()),
                (ReceiptBucket::Vendor, receipt.vendor.clone().into()),
                (ReceiptBucket::Description, receipt.description.clone().into()),
                (ReceiptBucket::Notes, receipt.notes.clone().into()),
                (ReceiptBucket::CategoryId, opt_id_value(receipt.category_id).into()),
                (ReceiptBucket::ItemId, opt_id_value(receipt.item_id).into()),
                (ReceiptBucket::AssetId, receipt.asset_id.clone().into()),
                (ReceiptBucket::AlbumId, receipt.album_id.clone().into()),
                (ReceiptBucket::PictureUri, receipt.picture_uri.clone().into()),
            ])
            .and_where(Expr::col(ReceiptBucket::Id).eq(id.to_i64()))
            .to_owned();
        self.store.apply_change(&update).await
    }

    pub async fn update_job_id(&self, id: UniqueId, job_id: UniqueId) -> DbStatus {
        let update = Query::update()
            .table(ReceiptBucket::Table)
            .values([(ReceiptBucket::JobId, job_id.to_i64().into())])
            .and_where(Expr::col(ReceiptBucket::Id).eq(id.to_i64()))
            .to_owned();
        report_status("update receipt job", self.store.apply_change(&update).await)
    }

    pub async fn delete_receipt(&self, id: UniqueId) -> DbStatus {
        let delete = Query::delete()
            .from_table(ReceiptBucket::Table)
            .and_where(Expr::col(ReceiptBucket::Id).eq(id.to_i64()))
            .to_owned();
        report_status("delete receipt", self.store.apply_change(&delete).await)
    }

    pub async fn fetch_job_receipts(&self, job_id: UniqueId) -> Listing<ReceiptData> {
        report_listing("fetch receipts", self.try_fetch_job(job_id).await)
    }

    async fn try_fetch_job(&self, job_id: UniqueId) -> TrakrResult<Vec<ReceiptData>> {
        let select = receipt_select()
            .and_where(Expr::col(ReceiptBucket::JobId).eq(job_id.to_i64()))
            .order_by(ReceiptBucket::Id, Order::Asc)
            .to_owned();
        let rows = self.store.fetch_all(&select).await?;
        rows.iter().map(receipt_from_row).collect()
    }

    pub async fn fetch_receipt(&self, id: UniqueId) -> Fetched<ReceiptData> {
        report_fetched("fetch receipt", self.try_fetch_one(id).await)
    }

    async fn try_fetch_one(&self, id: UniqueId) -> TrakrResult<Option<ReceiptData>> {
        let select = receipt_select()
            .and_where(Expr::col(ReceiptBucket::Id).eq(id.to_i64()))
            .limit(1)
            .to_owned();
        let row = self.store.fetch_one(&select).await?;
        row.as_ref().map(receipt_from_row).transpose()
    }
}

fn receipt_select() -> SelectStatement {
    Query::select()
        .columns([
            ReceiptBucket::Id,
            ReceiptBucket::UserId,
            ReceiptBucket::JobId,
            ReceiptBucket::DeviceId,
            ReceiptBucket::Amount,
            ReceiptBucket::Vendor,
            ReceiptBucket::Description,
            ReceiptBucket::Notes,
            ReceiptBucket::CategoryId,
            ReceiptBucket::ItemId,
            ReceiptBucket::AssetId,
            ReceiptBucket::AlbumId,
            ReceiptBucket::PictureUri,
        ])
        .from(ReceiptBucket::Table)
        .to_owned()
}

fn receipt_from_row(row: &QueryResult) -> TrakrResult<ReceiptData> {
    Ok(ReceiptData {
        id: Some(read_id(row, ReceiptBucket::Id)?),
        user_id: read(row, ReceiptBucket::UserId)?,
        job_id: read_opt_id(row, ReceiptBucket::JobId)?,
        device_id: read_opt_id(row, ReceiptBucket::DeviceId)?,
        amount: read(row, ReceiptBucket::Amount)?,
        vendor: read(row, ReceiptBucket::Vendor)?,
        description: read(row, ReceiptBucket::Description)?,
        notes: read(row, ReceiptBucket::Notes)?,
        category_id: read_opt_id(row, ReceiptBucket::CategoryId)?,
        item_id: read_opt_id(row, ReceiptBucket::ItemId)?,
        asset_id: read(row, ReceiptBucket::AssetId)?,
        album_id: read(row, ReceiptBucket::AlbumId)?,
        picture_uri: read(row, ReceiptBucket::PictureUri)?,
    })
}
