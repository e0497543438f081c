use sea_orm::QueryResult;
use sea_orm::sea_query::{Expr, Order, Query, SelectStatement};

use super::{report_created, report_fetched, report_listing, report_status, require_id};
use crate::db::Vendors;
use crate::store::{TrakrStore, read, read_id};
use jobtrakr_core::{
    Created, DbStatus, Fetched, Listing, NamespaceId, TrakrResult, UniqueId, VendorData,
};

#[derive(Clone)]
pub struct VendorStore {
    store: TrakrStore,
    namespace: NamespaceId,
}

impl VendorStore {
    pub fn new(store: TrakrStore, namespace: NamespaceId) -> Self {
        Self { store, namespace }
    }

    fn user_id(&self) -> i64 {
        i64::from(self.namespace.as_u32())
    }

    /// Vendors always belong to this store's namespace; `vendor.user_id` is ignored.
    pub async fn create_vendor(&self, vendor: &VendorData) -> Created {
        let user_id = self.user_id();
        let result = self
            .store
            .create_row(self.namespace, |id| {
                Query::insert()
                    .into_table(Vendors::Table)
                    .columns([
                        Vendors::Id,
                        Vendors::UserId,
                        Vendors::VendorName,
                        Vendors::Address,
                        Vendors::Address2,
                        Vendors::City,
                        Vendors::State,
                        Vendors::Zip,
                        Vendors::MobilePhone,
                        Vendors::BusinessPhone,
                        Vendors::Notes,
                    ])
                    .values_panic([
                        id.to_i64().into(),
                        user_id.into(),
                        vendor.vendor_name.clone().into(),
                        vendor.address.clone().into(),
                        vendor.address2.clone().into(),
                        vendor.city.clone().into(),
                        vendor.state.clone().into(),
                        vendor.zip.clone().into(),
                        vendor.mobile_phone.clone().into(),
                        vendor.business_phone.clone().into(),
                        vendor.notes.clone().into(),
                    ])
                    .to_owned()
            })
            .await;
        report_created("create vendor", result)
    }

    pub async fn update_vendor(&self, vendor: &VendorData) -> DbStatus {
        report_status("update vendor", self.try_update(vendor).await)
    }

    async fn try_update(&self, vendor: &VendorData) -> TrakrResult<DbStatus> {
        let id = require_id(vendor.id, "vendor")?;
        let update = Query::update()
            .table(Vendors::Table)
            .values([
                (Vendors::VendorName, vendor.vendor_name.clone().into()),
                (Vendors::Address, vendor.address.clone().into()),
                (Vendors::Address2, vendor.address2.clone().into()),
                (Vendors::City, vendor.city.clone().into()),
                (Vendors::State, vendor.state.clone().into()),
                (Vendors::Zip, vendor.zip.clone().into()),
                (Vendors::MobilePhone, vendor.mobile_phone.clone().into()),
                (Vendors::BusinessPhone, vendor.business_phone.clone().into()),
                (Vendors::Notes, vendor.notes.clone().into()),
            ])
            .and_where(Expr::col(Vendors::Id).eq(id.to_i64()))
            .to_owned();
        self.store.apply_change(&update).await
    }

    pub async fn delete_vendor(&self, id: UniqueId) -> DbStatus {
        let delete = Query::delete()
            .from_table(Vendors::Table)
            .and_where(Expr::col(Vendors::Id).eq(id.to_i64()))
            .to_owned();
        report_status("delete vendor", self.store.apply_change(&delete).await)
    }

    pub async fn fetch_vendor(&self, id: UniqueId) -> Fetched<VendorData> {
        report_fetched("fetch vendor", self.try_fetch_one(id).await)
    }

    async fn try_fetch_one(&self, id: UniqueId) -> TrakrResult<Option<VendorData>> {
        let select = vendor_select()
            .and_where(Expr::col(Vendors::Id).eq(id.to_i64()))
            .limit(1)
            .to_owned();
        let row = self.store.fetch_one(&select).await?;
        row.as_ref().map(vendor_from_row).transpose()
    }

    pub async fn fetch_all_vendors(&self) -> Listing<VendorData> {
        report_listing("fetch vendors", self.try_fetch_all().await)
    }

    async fn try_fetch_all(&self) -> TrakrResult<Vec<VendorData>> {
        let select = vendor_select()
            .and_where(Expr::col(Vendors::UserId).eq(self.user_id()))
            .order_by(Vendors::VendorName, Order::Asc)
            .to_owned();
        let rows = self.store.fetch_all(&select).await?;
        rows.iter().map(vendor_from_row).collect()
    }
}

fn vendor_select() -> SelectStatement {
    Query::select()
        .columns([
            Vendors::Id,
            Vendors::UserId,
            Vendors::VendorName,
            Vendors::Address,
            Vendors::Address2,
            Vendors::City,
            Vendors::State,
            Vendors::Zip,
            Vendors::MobilePhone,
            Vendors::BusinessPhone,
            Vendors::Notes,
        ])
        .from(Vendors::Table)
        .to_owned()
}

fn vendor_from_row(row: &QueryResult) -> TrakrResult<VendorData> {
    Ok(VendorData {
        id: Some(read_id(row, Vendors::Id)?),
        user_id: read(row, Vendors::UserId)?,
        vendor_name: read(row, Vendors::VendorName)?,
        address: read(row, Vendors::Address)?,
        address2: read(row, Vendors::Address2)?,
        city: read(row, Vendors::City)?,
        state: read(row, Vendors::State)?,
        zip: read(row, Vendors::Zip)?,
        mobile_phone: read(row, Vendors::MobilePhone)?,
        business_phone: read(row, Vendors::BusinessPhone)?,
        notes: read(row, Vendors::Notes)?,
    })
}
