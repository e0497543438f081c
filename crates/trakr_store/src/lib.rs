pub mod allocator;
pub mod config;
pub mod datastore;
mod db;
pub mod logger;
pub mod migration;
pub mod sample;
pub mod store;
pub mod stores;
pub mod unique_id;

pub use config::{DatabaseConfig, LogSinkConfig, PoolConfig, TrakrConfig};
pub use datastore::{
    copy_database_to, default_sqlite_path, delete_database, load_or_init_config, open_store,
};
pub use jobtrakr_core::*;
pub use logger::{ConsoleSink, DbLogger, FileSink, LogRecord, LogSink, RemoteSink, StoreSink};
pub use sample::seed_sample_data;
pub use store::{ExclusiveTransaction, StoreState, TrakrStore, insert_with_new_id};
pub use stores::{
    CategoryStore, DeviceStore, ItemStore, JobStore, PictureStore, ReceiptStore, TodoStore,
    VendorStore,
};
pub use unique_id::build_unique_id;
