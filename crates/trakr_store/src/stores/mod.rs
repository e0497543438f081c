//! Per-table data access.
//!
//! Every public operation reports a [`DbStatus`] instead of an error: failures
//! are logged here and collapse to `DbStatus::Error`.

mod categories;
mod devices;
mod items;
mod jobs;
mod pictures;
mod receipts;
mod todos;
mod vendors;

pub use categories::CategoryStore;
pub use devices::DeviceStore;
pub use items::ItemStore;
pub use jobs::JobStore;
pub use pictures::PictureStore;
pub use receipts::ReceiptStore;
pub use todos::TodoStore;
pub use vendors::VendorStore;

use log::error;

use jobtrakr_core::{Created, DbStatus, Fetched, Listing, TrakrResult, UniqueId};

fn report_status(op: &str, result: TrakrResult<DbStatus>) -> DbStatus {
    match result {
        Ok(status) => status,
        Err(err) => {
            error!("{op} failed: {err}");
            DbStatus::Error
        }
    }
}

fn report_created(op: &str, result: TrakrResult<UniqueId>) -> Created {
    match result {
        Ok(id) => Created::success(id),
        Err(err) => {
            error!("{op} failed: {err}");
            Created::error()
        }
    }
}

fn report_listing<T>(op: &str, result: TrakrResult<Vec<T>>) -> Listing<T> {
    match result {
        Ok(items) => Listing::success(items),
        Err(err) => {
            error!("{op} failed: {err}");
            Listing::error()
        }
    }
}

fn report_fetched<T>(op: &str, result: TrakrResult<Option<T>>) -> Fetched<T> {
    match result {
        Ok(value) => Fetched::from_option(value),
        Err(err) => {
            error!("{op} failed: {err}");
            Fetched::error()
        }
    }
}

/// Updates and deletes address rows by primary key; a row without one is rejected.
fn require_id(id: Option<UniqueId>, what: &str) -> TrakrResult<UniqueId> {
    id.ok_or_else(|| jobtrakr_core::TrakrError::invalid(format!("{what} has no id")))
}
