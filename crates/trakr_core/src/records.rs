//! Row shapes exchanged with the entity stores.
//!
//! `id` is `None` on input to a create call and always set on rows read back.
//! Date columns hold ISO-8601 text supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::UniqueId;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobData {
    pub id: Option<UniqueId>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub job_type_id: Option<i64>,
    pub customer_id: i64,
    pub job_location: Option<String>,
    pub start_date: Option<String>,
    pub planned_finish: Option<String>,
    pub bid_price: Option<f64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub radius: Option<f64>,
    pub job_status: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryData {
    pub id: Option<UniqueId>,
    pub job_id: Option<UniqueId>,
    pub code: Option<String>,
    pub category_name: Option<String>,
    pub start_date: Option<String>,
    pub est_price: Option<f64>,
    pub category_status: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: Option<UniqueId>,
    pub category_id: Option<UniqueId>,
    pub code: Option<String>,
    pub item_name: Option<String>,
    pub est_price: Option<f64>,
    pub item_status: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PictureData {
    pub id: Option<UniqueId>,
    pub customer_id: Option<i64>,
    pub job_id: Option<UniqueId>,
    pub device_id: Option<UniqueId>,
    pub folder_name: Option<String>,
    pub picture_name: Option<String>,
    pub date_added: Option<String>,
    pub picture_date: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptData {
    pub id: Option<UniqueId>,
    pub user_id: Option<i64>,
    pub job_id: Option<UniqueId>,
    pub device_id: Option<UniqueId>,
    pub amount: Option<f64>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub category_id: Option<UniqueId>,
    pub item_id: Option<UniqueId>,
    pub asset_id: Option<String>,
    pub album_id: Option<String>,
    pub picture_uri: Option<String>,
}

/// Platform identity of the running device, detected by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub name: Option<String>,
    pub device_id: String,
    pub device_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceData {
    pub id: UniqueId,
    pub user_id: i64,
    pub name: Option<String>,
    pub device_id: Option<String>,
    pub device_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorData {
    pub id: Option<UniqueId>,
    pub user_id: Option<i64>,
    pub vendor_name: Option<String>,
    pub address: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub mobile_phone: Option<String>,
    pub business_phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoData {
    pub id: Option<UniqueId>,
    pub job_id: Option<UniqueId>,
    pub user_id: Option<i64>,
    pub todo: Option<String>,
    pub completed: bool,
}
