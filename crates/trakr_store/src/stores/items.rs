use sea_orm::QueryResult;
use sea_orm::sea_query::{Expr, Order, Query};

use super::categories::DEFAULT_STATUS;
use super::{report_created, report_listing, report_status, require_id};
use crate::db::Items;
use crate::store::{TrakrStore, opt_id_value, read, read_id, read_opt_id};
use jobtrakr_core::{Created, DbStatus, ItemData, Listing, NamespaceId, TrakrResult, UniqueId};

#[derive(Clone)]
pub struct ItemStore {
    store: TrakrStore,
    namespace: NamespaceId,
}

impl ItemStore {
    pub fn new(store: TrakrStore, namespace: NamespaceId) -> Self {
        Self { store, namespace }
    }

    pub async fn create_item(&self, item: &ItemData) -> Created {
        let code = item.code.clone().unwrap_or_default();
        let status = item
            .item_status
            .clone()
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let result = self
            .store
            .create_row(self.namespace, |id| {
                Query::insert()
                    .into_table(Items::Table)
                    .columns([
                        Items::Id,
                        Items::CategoryId,
                        Items::Code,
                        Items::ItemName,
                        Items::EstPrice,
                        Items::ItemStatus,
                    ])
                    .values_panic([
                        id.to_i64().into(),
                        opt_id_value(item.category_id).into(),
                        code.into(),
                        item.item_name.clone().into(),
                        item.est_price.into(),
                        status.into(),
                    ])
                    .to_owned()
            })
            .await;
        report_created("create item", result)
    }

    pub async fn update_item(&self, item: &ItemData) -> DbStatus {
        report_status("update item", self.try_update(item).await)
    }

    async fn try_update(&self, item: &ItemData) -> TrakrResult<DbStatus> {
        let id = require_id(item.id, "item")?;
        let update = Query::update()
            .table(Items::Table)
            .values([
                (Items::CategoryId, opt_id_value(item.category_id).into()),
                (Items::Code, item.code.clone().into()),
                (Items::ItemName, item.item_name.clone().into()),
                (Items::EstPrice, item.est_price.into()),
                (Items::ItemStatus, item.item_status.clone().into()),
            ])
            .and_where(Expr::col(Items::Id).eq(id.to_i64()))
            .to_owned();
        self.store.apply_change(&update).await
    }

    pub async fn delete_item(&self, id: UniqueId) -> DbStatus {
        let delete = Query::delete()
            .from_table(Items::Table)
            .and_where(Expr::col(Items::Id).eq(id.to_i64()))
            .to_owned();
        report_status("delete item", self.store.apply_change(&delete).await)
    }

    pub async fn fetch_category_items(&self, category_id: UniqueId) -> Listing<ItemData> {
        report_listing("fetch items", self.try_fetch(category_id).await)
    }

    async fn try_fetch(&self, category_id: UniqueId) -> TrakrResult<Vec<ItemData>> {
        let select = Query::select()
            .columns([
                Items::Id,
                Items::CategoryId,
                Items::Code,
                Items::ItemName,
                Items::EstPrice,
                Items::ItemStatus,
            ])
            .from(Items::Table)
            .and_where(Expr::col(Items::CategoryId).eq(category_id.to_i64()))
            .order_by(Items::Id, Order::Asc)
            .to_owned();
        let rows = self.store.fetch_all(&select).await?;
        rows.iter().map(item_from_row).collect()
    }
}

fn item_from_row(row: &QueryResult) -> TrakrResult<ItemData> {
    Ok(ItemData {
        id: Some(read_id(row, Items::Id)?),
        category_id: read_opt_id(row, Items::CategoryId)?,
        code: read(row, Items::Code)?,
        item_name: read(row, Items::ItemName)?,
        est_price: read(row, Items::EstPrice)?,
        item_status: read(row, Items::ItemStatus)?,
    })
}
