use sea_orm::QueryResult;
use sea_orm::sea_query::{Expr, Order, Query};

use super::{report_created, report_listing, report_status, require_id};
use crate::db::Jobs;
use crate::store::{TrakrStore, read, read_id};
use jobtrakr_core::{
    Created, DbStatus, JobData, Listing, NamespaceId, TrakrResult, UniqueId,
};

#[derive(Clone)]
pub struct JobStore {
    store: TrakrStore,
    namespace: NamespaceId,
}

impl JobStore {
    pub fn new(store: TrakrStore, namespace: NamespaceId) -> Self {
        Self { store, namespace }
    }

    pub async fn create_job(&self, job: &JobData) -> Created {
        let result = self
            .store
            .create_row(self.namespace, |id| {
                Query::insert()
                    .into_table(Jobs::Table)
                    .columns([
                        Jobs::Id,
                        Jobs::Code,
                        Jobs::Name,
                        Jobs::JobTypeId,
                        Jobs::CustomerId,
                        Jobs::JobLocation,
                        Jobs::StartDate,
                        Jobs::PlannedFinish,
                        Jobs::BidPrice,
                        Jobs::Longitude,
                        Jobs::Latitude,
                        Jobs::Radius,
                        Jobs::JobStatus,
                    ])
                    .values_panic([
                        id.to_i64().into(),
                        job.code.clone().into(),
                        job.name.clone().into(),
                        job.job_type_id.into(),
                        job.customer_id.into(),
                        job.job_location.clone().into(),
                        job.start_date.clone().into(),
                        job.planned_finish.clone().into(),
                        job.bid_price.into(),
                        job.longitude.into(),
                        job.latitude.into(),
                        job.radius.into(),
                        job.job_status.clone().into(),
                    ])
                    .to_owned()
            })
            .await;
        report_created("create job", result)
    }

    pub async fn update_job(&self, job: &JobData) -> DbStatus {
        report_status("update job", self.try_update_job(job).await)
    }

    async fn try_update_job(&self, job: &JobData) -> TrakrResult<DbStatus> {
        let id = require_id(job.id, "job")?;
        let update = Query::update()
            .table(Jobs::Table)
            .values([
                (Jobs::Code, job.code.clone().into()),
                (Jobs::Name, job.name.clone().into()),
                (Jobs::JobTypeId, job.job_type_id.into()),
                (Jobs::CustomerId, job.customer_id.into()),
                (Jobs::JobLocation, job.job_location.clone().into()),
                (Jobs::StartDate, job.start_date.clone().into()),
                (Jobs::PlannedFinish, job.planned_finish.clone().into()),
                (Jobs::BidPrice, job.bid_price.into()),
                (Jobs::Longitude, job.longitude.into()),
                (Jobs::Latitude, job.latitude.into()),
                (Jobs::Radius, job.radius.into()),
                (Jobs::JobStatus, job.job_status.clone().into()),
            ])
            .and_where(Expr::col(Jobs::Id).eq(id.to_i64()))
            .to_owned();
        self.store.apply_change(&update).await
    }

    /// Updates the geofence of a job.
    pub async fn update_location(
        &self,
        id: UniqueId,
        longitude: f64,
        latitude: f64,
        radius: f64,
    ) -> DbStatus {
        let update = Query::update()
            .table(Jobs::Table)
            .values([
                (Jobs::Longitude, longitude.into()),
                (Jobs::Latitude, latitude.into()),
                (Jobs::Radius, radius.into()),
            ])
            .and_where(Expr::col(Jobs::Id).eq(id.to_i64()))
            .to_owned();
        report_status("update job location", self.store.apply_change(&update).await)
    }

    pub async fn delete_job(&self, id: UniqueId) -> DbStatus {
        let delete = Query::delete()
            .from_table(Jobs::Table)
            .and_where(Expr::col(Jobs::Id).eq(id.to_i64()))
            .to_owned();
        report_status("delete job", self.store.apply_change(&delete).await)
    }

    pub async fn fetch_all_jobs(&self) -> Listing<JobData> {
        report_listing("fetch jobs", self.try_fetch_all_jobs().await)
    }

    async fn try_fetch_all_jobs(&self) -> TrakrResult<Vec<JobData>> {
        let select = Query::select()
            .columns([
                Jobs::Id,
                Jobs::Code,
                Jobs::Name,
                Jobs::JobTypeId,
                Jobs::CustomerId,
                Jobs::JobLocation,
                Jobs::StartDate,
                Jobs::PlannedFinish,
                Jobs::BidPrice,
                Jobs::Longitude,
                Jobs::Latitude,
                Jobs::Radius,
                Jobs::JobStatus,
            ])
            .from(Jobs::Table)
            .order_by(Jobs::Id, Order::Asc)
            .to_owned();
        let rows = self.store.fetch_all(&select).await?;
        rows.iter().map(job_from_row).collect()
    }
}

fn job_from_row(row: &QueryResult) -> TrakrResult<JobData> {
    Ok(JobData {
        id: Some(read_id(row, Jobs::Id)?),
        code: read(row, Jobs::Code)?,
        name: read(row, Jobs::Name)?,
        job_type_id: read(row, Jobs::JobTypeId)?,
        customer_id: read(row, Jobs::CustomerId)?,
        job_location: read(row, Jobs::JobLocation)?,
        start_date: read(row, Jobs::StartDate)?,
        planned_finish: read(row, Jobs::PlannedFinish)?,
        bid_price: read(row, Jobs::BidPrice)?,
        longitude: read(row, Jobs::Longitude)?,
        latitude: read(row, Jobs::Latitude)?,
        radius: read(row, Jobs::Radius)?,
        job_status: read(row, Jobs::JobStatus)?,
    })
}
