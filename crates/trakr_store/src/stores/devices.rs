use log::info;
use sea_orm::QueryResult;
use sea_orm::sea_query::{Expr, Query};

use super::{report_fetched, report_status};
use crate::db::Devices;
use crate::store::{TrakrStore, insert_with_new_id, query_one, read, read_id};
use jobtrakr_core::{
    DbStatus, DeviceData, DeviceIdentity, Fetched, NamespaceId, TrakrResult, UniqueId,
};

#[derive(Clone)]
pub struct DeviceStore {
    store: TrakrStore,
    namespace: NamespaceId,
}

impl DeviceStore {
    pub fn new(store: TrakrStore, namespace: NamespaceId) -> Self {
        Self { store, namespace }
    }

    /// Returns the row for this platform device, creating it on first sight.
    ///
    /// Lookup and insert share one exclusive transaction so two callers cannot
    /// both register the same device. The resulting row id becomes the store's
    /// registered device.
    pub async fn get_or_register(&self, identity: &DeviceIdentity) -> Fetched<DeviceData> {
        let result = match self.try_get_or_register(identity).await {
            Ok(Some(device)) => self.store.register_device_id(device.id).map(|()| Some(device)),
            other => other,
        };
        report_fetched("register device", result)
    }

    async fn try_get_or_register(
        &self,
        identity: &DeviceIdentity,
    ) -> TrakrResult<Option<DeviceData>> {
        let tx = self.store.begin_exclusive().await?;
        let select = Query::select()
            .columns([
                Devices::Id,
                Devices::UserId,
                Devices::Name,
                Devices::DeviceId,
                Devices::DeviceType,
            ])
            .from(Devices::Table)
            .and_where(Expr::col(Devices::DeviceId).eq(identity.device_id.as_str()))
            .limit(1)
            .to_owned();
        if let Some(row) = query_one(&*tx, &select).await? {
            let device = device_from_row(&row)?;
            tx.commit().await?;
            return Ok(Some(device));
        }

        let user_id = i64::from(self.namespace.as_u32());
        let id = insert_with_new_id(&*tx, self.namespace, |id| {
            Query::insert()
                .into_table(Devices::Table)
                .columns([
                    Devices::Id,
                    Devices::UserId,
                    Devices::Name,
                    Devices::DeviceId,
                    Devices::DeviceType,
                ])
                .values_panic([
                    id.to_i64().into(),
                    user_id.into(),
                    identity.name.clone().into(),
                    identity.device_id.clone().into(),
                    identity.device_type.clone().into(),
                ])
                .to_owned()
        })
        .await?;
        tx.commit().await?;
        info!("devices: registered {} as {id}", identity.device_id);
        Ok(Some(DeviceData {
            id,
            user_id,
            name: identity.name.clone(),
            device_id: Some(identity.device_id.clone()),
            device_type: Some(identity.device_type.clone()),
        }))
    }

    pub async fn delete_device(&self, id: UniqueId) -> DbStatus {
        let delete = Query::delete()
            .from_table(Devices::Table)
            .and_where(Expr::col(Devices::Id).eq(id.to_i64()))
            .to_owned();
        report_status("delete device", self.store.apply_change(&delete).await)
    }
}

fn device_from_row(row: &QueryResult) -> TrakrResult<DeviceData> {
    Ok(DeviceData {
        id: read_id(row, Devices::Id)?,
        user_id: read(row, Devices::UserId)?,
        name: read(row, Devices::Name)?,
        device_id: read(row, Devices::DeviceId)?,
        device_type: read(row, Devices::DeviceType)?,
    })
}
