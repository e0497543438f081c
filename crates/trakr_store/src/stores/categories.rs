use sea_orm::QueryResult;
use sea_orm::sea_query::{Expr, Order, Query};

use super::{report_created, report_listing, report_status, require_id};
use crate::db::Categories;
use crate::store::{TrakrStore, opt_id_value, read, read_id, read_opt_id};
use jobtrakr_core::{
    CategoryData, Created, DbStatus, Listing, NamespaceId, TrakrResult, UniqueId,
};

pub(crate) const DEFAULT_STATUS: &str = "Active";

#[derive(Clone)]
pub struct CategoryStore {
    store: TrakrStore,
    namespace: NamespaceId,
}

impl CategoryStore {
    pub fn new(store: TrakrStore, namespace: NamespaceId) -> Self {
        Self { store, namespace }
    }

    /// New categories default to status `Active` and an empty code.
    pub async fn create_category(&self, category: &CategoryData) -> Created {
        let code = category.code.clone().unwrap_or_default();
        let status = category
            .category_status
            .clone()
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let result = self
            .store
            .create_row(self.namespace, |id| {
                Query::insert()
                    .into_table(Categories::Table)
                    .columns([
                        Categories::Id,
                        Categories::JobId,
                        Categories::Code,
                        Categories::CategoryName,
                        Categories::StartDate,
                        Categories::EstPrice,
                        Categories::CategoryStatus,
                    ])
                    .values_panic([
                        id.to_i64().into(),
                        opt_id_value(category.job_id).into(),
                        code.into(),
                        category.category_name.clone().into(),
                        category.start_date.clone().into(),
                        category.est_price.into(),
                        status.into(),
                    ])
                    .to_owned()
            })
            .await;
        report_created("create category", result)
    }

    pub async fn update_category(&self, category: &CategoryData) -> DbStatus {
        report_status("update category", self.try_update(category).await)
    }

    async fn try_update(&self, category: &CategoryData) -> TrakrResult<DbStatus> {
        let id = require_id(category.id, "category")?;
        let update = Query::update()
            .table(Categories::Table)
            .values([
                (Categories::JobId, opt_id_value(category.job_id).into()),
                (Categories::Code, category.code.clone().into()),
                (Categories::CategoryName, category.category_name.clone().into()),
                (Categories::StartDate, category.start_date.clone().into()),
                (Categories::EstPrice, category.est_price.into()),
                (Categories::CategoryStatus, category.category_status.clone().into()),
            ])
            .and_where(Expr::col(Categories::Id).eq(id.to_i64()))
            .to_owned();
        self.store.apply_change(&update).await
    }

    pub async fn delete_category(&self, id: UniqueId) -> DbStatus {
        let delete = Query::delete()
            .from_table(Categories::Table)
            .and_where(Expr::col(Categories::Id).eq(id.to_i64()))
            .to_owned();
        report_status("delete category", self.store.apply_change(&delete).await)
    }

    pub async fn fetch_job_categories(&self, job_id: UniqueId) -> Listing<CategoryData> {
        report_listing("fetch categories", self.try_fetch(job_id).await)
    }

    async fn try_fetch(&self, job_id: UniqueId) -> TrakrResult<Vec<CategoryData>> {
        let select = Query::select()
            .columns([
                Categories::Id,
                Categories::JobId,
                Categories::Code,
                Categories::CategoryName,
                Categories::StartDate,
                Categories::EstPrice,
                Categories::CategoryStatus,
            ])
            .from(Categories::Table)
            .and_where(Expr::col(Categories::JobId).eq(job_id.to_i64()))
            .order_by(Categories::Id, Order::Asc)
            .to_owned();
        let rows = self.store.fetch_all(&select).await?;
        rows.iter().map(category_from_row).collect()
    }
}

fn category_from_row(row: &QueryResult) -> TrakrResult<CategoryData> {
    Ok(CategoryData {
        id: Some(read_id(row, Categories::Id)?),
        job_id: read_opt_id(row, Categories::JobId)?,
        code: read(row, Categories::Code)?,
        category_name: read(row, Categories::CategoryName)?,
        start_date: read(row, Categories::StartDate)?,
        est_price: read(row, Categories::EstPrice)?,
        category_status: read(row, Categories::CategoryStatus)?,
    })
}
