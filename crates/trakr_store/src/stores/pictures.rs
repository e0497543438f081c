use sea_orm::QueryResult;
use sea_orm::sea_query::{Expr, Order, Query};

use super::{report_created, report_listing, report_status};
use crate::db::PictureBucket;
use crate::store::{TrakrStore, opt_id_value, read, read_id, read_opt_id};
use jobtrakr_core::{
    Created, DbStatus, Listing, NamespaceId, PictureData, TrakrResult, UniqueId,
};

#[derive(Clone)]
pub struct PictureStore {
    store: TrakrStore,
    namespace: NamespaceId,
}

impl PictureStore {
    pub fn new(store: TrakrStore, namespace: NamespaceId) -> Self {
        Self { store, namespace }
    }

    pub async fn insert_picture(&self, picture: &PictureData) -> Created {
        let result = self
            .store
            .create_row(self.namespace, |id| {
                Query::insert()
                    .into_table(PictureBucket::Table)
                    .columns([
                        PictureBucket::Id,
                        PictureBucket::CustomerId,
                        PictureBucket::JobId,
                        PictureBucket::DeviceId,
                        PictureBucket::FolderName,
                        PictureBucket::PictureName,
                        PictureBucket::DateAdded,
                        PictureBucket::PictureDate,
                    ])
                    .values_panic([
                        id.to_i64().into(),
                        picture.customer_id.into(),
                        opt_id_value(picture.job_id).into(),
                        opt_id_value(picture.device_id).into(),
                        picture.folder_name.clone().into(),
                        picture.picture_name.clone().into(),
                        picture.date_added.clone().into(),
                        picture.picture_date.clone().into(),
                    ])
                    .to_owned()
            })
            .await;
        report_created("insert picture", result)
    }

    /// Moves a picture to another job.
    pub async fn update_job_id(&self, id: UniqueId, job_id: UniqueId) -> DbStatus {
        let update = Query::update()
            .table(PictureBucket::Table)
            .values([(PictureBucket::JobId, job_id.to_i64().into())])
            .and_where(Expr::col(PictureBucket::Id).eq(id.to_i64()))
            .to_owned();
        report_status("update picture job", self.store.apply_change(&update).await)
    }

    pub async fn delete_picture(&self, id: UniqueId) -> DbStatus {
        let delete = Query::delete()
            .from_table(PictureBucket::Table)
            .and_where(Expr::col(PictureBucket::Id).eq(id.to_i64()))
            .to_owned();
        report_status("delete picture", self.store.apply_change(&delete).await)
    }

    pub async fn fetch_job_pictures(&self, job_id: UniqueId) -> Listing<PictureData> {
        report_listing("fetch pictures", self.try_fetch(job_id).await)
    }

    async fn try_fetch(&self, job_id: UniqueId) -> TrakrResult<Vec<PictureData>> {
        let select = Query::select()
            .columns([
                PictureBucket::Id,
                PictureBucket::CustomerId,
                PictureBucket::JobId,
                PictureBucket::DeviceId,
                PictureBucket::FolderName,
                PictureBucket::PictureName,
                PictureBucket::DateAdded,
                PictureBucket::PictureDate,
            ])
            .from(PictureBucket::Table)
            .and_where(Expr::col(PictureBucket::JobId).eq(job_id.to_i64()))
            .order_by(PictureBucket::Id, Order::Asc)
            .to_owned();
        let rows = self.store.fetch_all(&select).await?;
        rows.iter().map(picture_from_row).collect()
    }
}

fn picture_from_row(row: &QueryResult) -> TrakrResult<PictureData> {
    Ok(PictureData {
        id: Some(read_id(row, PictureBucket::Id)?),
        customer_id: read(row, PictureBucket::CustomerId)?,
        job_id: read_opt_id(row, PictureBucket::JobId)?,
        device_id: read_opt_id(row, PictureBucket::DeviceId)?,
        folder_name: read(row, PictureBucket::FolderName)?,
        picture_name: read(row, PictureBucket::PictureName)?,
        date_added: read(row, PictureBucket::DateAdded)?,
        picture_date: read(row, PictureBucket::PictureDate)?,
    })
}
