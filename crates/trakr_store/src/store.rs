use std::ops::Deref;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use log::{debug, info, warn};
use sea_orm::sea_query::{Iden, InsertStatement, QueryStatementWriter, SqliteQueryBuilder};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, ExecResult, QueryResult, Statement, TransactionTrait, TryGetable,
};
use sea_orm_migration::MigratorTrait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::TrakrConfig;
use crate::allocator::{current_sequence, ensure_id_table};
use crate::migration::Migrator;
use crate::unique_id::build_unique_id;
use jobtrakr_core::{AllocationError, DbStatus, NamespaceId, TrakrError, TrakrResult, UniqueId};

/// Lifecycle of a store handle: connected, schema ready, released.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreState {
    Open,
    Useable,
    Closed,
}

struct Lifecycle {
    state: StoreState,
    conn: Option<DatabaseConnection>,
}

struct StoreInner {
    lifecycle: RwLock<Lifecycle>,
    write_gate: Arc<Mutex<()>>,
    device_id: RwLock<Option<UniqueId>>,
}

/// Shared handle to one physical job-tracking database.
///
/// Cheap to clone; every entity store is constructed from one of these plus the
/// namespace it writes under. All writes go through [`TrakrStore::begin_exclusive`],
/// which serializes them behind a single async gate for the lifetime of the
/// SQLite transaction.
#[derive(Clone)]
pub struct TrakrStore {
    inner: Arc<StoreInner>,
}

/// A SQLite transaction that holds the store's write gate until it is
/// committed, rolled back or dropped. Dropping without commit rolls back.
pub struct ExclusiveTransaction {
    tx: DatabaseTransaction,
    _gate: OwnedMutexGuard<()>,
}

impl ExclusiveTransaction {
    pub async fn commit(self) -> TrakrResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> TrakrResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

impl Deref for ExclusiveTransaction {
    type Target = DatabaseTransaction;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl TrakrStore {
    /// Opens the database and brings its schema up to date.
    pub async fn connect(config: &TrakrConfig, base_dir: &Path) -> TrakrResult<Self> {
        let store = Self::open(config, base_dir).await?;
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Opens the database without touching its schema. The handle stays
    /// [`StoreState::Open`] until [`TrakrStore::ensure_schema`] succeeds.
    pub async fn open(config: &TrakrConfig, base_dir: &Path) -> TrakrResult<Self> {
        let mut options = ConnectOptions::new(config.connection_url(base_dir));
        if let Some(pool) = &config.pool {
            if let Some(max) = pool.max_connections {
                options.max_connections(max);
            }
            if let Some(min) = pool.min_connections {
                options.min_connections(min);
            }
            if let Some(timeout_ms) = pool.connect_timeout_ms {
                options.connect_timeout(Duration::from_millis(timeout_ms));
            }
            if let Some(timeout_ms) = pool.acquire_timeout_ms {
                options.acquire_timeout(Duration::from_millis(timeout_ms));
            }
            if let Some(timeout_ms) = pool.idle_timeout_ms {
                options.idle_timeout(Duration::from_millis(timeout_ms));
            }
        }
        options.sqlx_logging(false);
        let conn = Database::connect(options).await?;
        info!("store: opened {}", config.sqlite_path(base_dir).display());
        Ok(Self {
            inner: Arc::new(StoreInner {
                lifecycle: RwLock::new(Lifecycle {
                    state: StoreState::Open,
                    conn: Some(conn),
                }),
                write_gate: Arc::new(Mutex::new(())),
                device_id: RwLock::new(None),
            }),
        })
    }

    /// Creates the id generator table and entity tables if missing. Idempotent.
    pub async fn ensure_schema(&self) -> TrakrResult<()> {
        let conn = self.raw_connection()?;
        ensure_id_table(&conn).await?;
        Migrator::up(&conn, None).await?;
        self.transition(StoreState::Useable)?;
        debug!("store: schema ready");
        Ok(())
    }

    pub fn state(&self) -> StoreState {
        self.inner
            .lifecycle
            .read()
            .map(|lifecycle| lifecycle.state)
            .unwrap_or(StoreState::Closed)
    }

    pub fn is_useable(&self) -> bool {
        self.state() == StoreState::Useable
    }

    /// Pool handle for reads. Fails unless the store is useable.
    pub fn connection(&self) -> TrakrResult<DatabaseConnection> {
        let lifecycle = self
            .inner
            .lifecycle
            .read()
            .map_err(|_| TrakrError::storage("store lifecycle poisoned"))?;
        match (&lifecycle.state, &lifecycle.conn) {
            (StoreState::Useable, Some(conn)) => Ok(conn.clone()),
            (state, _) => Err(TrakrError::unavailable(format!("store is {state:?}"))),
        }
    }

    fn raw_connection(&self) -> TrakrResult<DatabaseConnection> {
        let lifecycle = self
            .inner
            .lifecycle
            .read()
            .map_err(|_| TrakrError::storage("store lifecycle poisoned"))?;
        lifecycle
            .conn
            .clone()
            .ok_or_else(|| TrakrError::unavailable("store is Closed"))
    }

    fn transition(&self, next: StoreState) -> TrakrResult<()> {
        let mut lifecycle = self
            .inner
            .lifecycle
            .write()
            .map_err(|_| TrakrError::storage("store lifecycle poisoned"))?;
        if lifecycle.state == StoreState::Closed {
            return Err(TrakrError::unavailable("store is Closed"));
        }
        lifecycle.state = next;
        Ok(())
    }

    /// Waits for in-flight writes, then releases the pool. Closing twice is a no-op.
    pub async fn close(&self) -> TrakrResult<()> {
        let _gate = self.inner.write_gate.lock().await;
        let conn = {
            let mut lifecycle = self
                .inner
                .lifecycle
                .write()
                .map_err(|_| TrakrError::storage("store lifecycle poisoned"))?;
            lifecycle.state = StoreState::Closed;
            lifecycle.conn.take()
        };
        if let Some(conn) = conn {
            conn.close().await?;
            info!("store: closed");
        }
        Ok(())
    }

    /// Remembers the row id of the device this process runs on.
    pub fn register_device_id(&self, id: UniqueId) -> TrakrResult<()> {
        let mut device_id = self
            .inner
            .device_id
            .write()
            .map_err(|_| TrakrError::storage("device id registry poisoned"))?;
        *device_id = Some(id);
        Ok(())
    }

    pub fn device_id(&self) -> Option<UniqueId> {
        match self.inner.device_id.read() {
            Ok(device_id) => *device_id,
            Err(_) => {
                warn!("store: device id registry poisoned");
                None
            }
        }
    }

    pub async fn begin_exclusive(&self) -> TrakrResult<ExclusiveTransaction> {
        let gate = self.inner.write_gate.clone().lock_owned().await;
        let conn = self.connection()?;
        let tx = conn.begin().await?;
        Ok(ExclusiveTransaction { tx, _gate: gate })
    }

    /// Mints one id in its own exclusive transaction.
    pub async fn build_unique_id(
        &self,
        namespace: NamespaceId,
    ) -> Result<UniqueId, AllocationError> {
        let tx = self.begin_exclusive().await.map_err(|err| match err {
            TrakrError::Unavailable { .. } => AllocationError::StoreClosed,
            other => AllocationError::insert(other.to_string()),
        })?;
        let id = build_unique_id(&*tx, namespace).await?;
        tx.commit()
            .await
            .map_err(|err| AllocationError::insert(err.to_string()))?;
        Ok(id)
    }

    pub async fn current_sequence(&self) -> TrakrResult<Option<i64>> {
        let conn = self.connection()?;
        current_sequence(&conn).await
    }

    /// Allocates an id and inserts the row built from it as one unit.
    ///
    /// `build_insert` is only called once an id exists, so an insert is never
    /// attempted without a valid primary key. Either failure rolls the whole
    /// transaction back; the sequence value may still be burned.
    pub async fn create_row<F>(&self, namespace: NamespaceId, build_insert: F) -> TrakrResult<UniqueId>
    where
        F: FnOnce(UniqueId) -> InsertStatement,
    {
        let tx = self.begin_exclusive().await?;
        match insert_with_new_id(&*tx, namespace, build_insert).await {
            Ok(id) => {
                tx.commit().await?;
                debug!("create: committed {id}");
                Ok(id)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!("create: rollback failed: {rollback}");
                }
                debug!("create: aborted: {err}");
                Err(err)
            }
        }
    }

    /// Runs an update or delete in an exclusive transaction and reports whether
    /// any row changed.
    pub async fn apply_change<S>(&self, stmt: &S) -> TrakrResult<DbStatus>
    where
        S: QueryStatementWriter,
    {
        let tx = self.begin_exclusive().await?;
        match exec(&*tx, stmt).await {
            Ok(result) => {
                tx.commit().await?;
                Ok(DbStatus::from_rows_affected(result.rows_affected()))
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!("change: rollback failed: {rollback}");
                }
                debug!("change: aborted: {err}");
                Err(err)
            }
        }
    }

    pub async fn fetch_all<S>(&self, stmt: &S) -> TrakrResult<Vec<QueryResult>>
    where
        S: QueryStatementWriter,
    {
        let conn = self.connection()?;
        query_all(&conn, stmt).await
    }

    pub async fn fetch_one<S>(&self, stmt: &S) -> TrakrResult<Option<QueryResult>>
    where
        S: QueryStatementWriter,
    {
        let conn = self.connection()?;
        query_one(&conn, stmt).await
    }
}

/// Steps 1-3 of row creation on an already-open transaction: allocate, then
/// insert. Commit and rollback stay with the caller.
pub async fn insert_with_new_id<C, F>(
    conn: &C,
    namespace: NamespaceId,
    build_insert: F,
) -> TrakrResult<UniqueId>
where
    C: ConnectionTrait,
    F: FnOnce(UniqueId) -> InsertStatement,
{
    debug!("create: allocating id in namespace {namespace}");
    let id = build_unique_id(conn, namespace).await?;
    debug!("create: inserting row {id}");
    let insert = build_insert(id);
    exec(conn, &insert)
        .await
        .map_err(|err| TrakrError::insert(err.to_string()))?;
    Ok(id)
}

pub(crate) fn col_name(column: impl Iden) -> String {
    column.to_string()
}

pub(crate) fn read<T: TryGetable>(row: &QueryResult, column: impl Iden) -> TrakrResult<T> {
    Ok(row.try_get("", &col_name(column))?)
}

pub(crate) fn read_id(row: &QueryResult, column: impl Iden) -> TrakrResult<UniqueId> {
    let raw: i64 = read(row, column)?;
    Ok(UniqueId::from_i64(raw))
}

pub(crate) fn read_opt_id(row: &QueryResult, column: impl Iden) -> TrakrResult<Option<UniqueId>> {
    let raw: Option<i64> = read(row, column)?;
    Ok(raw.map(UniqueId::from_i64))
}

pub(crate) fn opt_id_value(id: Option<UniqueId>) -> Option<i64> {
    id.map(UniqueId::to_i64)
}

pub(crate) fn build_stmt<S: QueryStatementWriter>(stmt: &S) -> Statement {
    let (sql, values) = stmt.build(SqliteQueryBuilder);
    Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, values)
}

pub(crate) async fn exec<C, S>(conn: &C, stmt: &S) -> TrakrResult<ExecResult>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    Ok(conn.execute(build_stmt(stmt)).await?)
}

pub(crate) async fn query_all<C, S>(conn: &C, stmt: &S) -> TrakrResult<Vec<QueryResult>>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    Ok(conn.query_all(build_stmt(stmt)).await?)
}

pub(crate) async fn query_one<C, S>(conn: &C, stmt: &S) -> TrakrResult<Option<QueryResult>>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    Ok(conn.query_one(build_stmt(stmt)).await?)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use jobtrakr_core::{TrakrError, UniqueId};
    use tempfile::tempdir;

    use super::TrakrStore;
    use crate::TrakrConfig;

    #[tokio::test]
    async fn poisoned_device_registry_is_reported() {
        let dir = tempdir().expect("tempdir");
        let config = TrakrConfig::default_sqlite(dir.path().join("device.db").to_string_lossy());
        let store = TrakrStore::connect(&config, dir.path()).await.expect("connect");
        store
            .register_device_id(UniqueId::from_u64(5))
            .expect("register");
        assert_eq!(store.device_id(), Some(UniqueId::from_u64(5)));

        let poisoner = store.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.inner.device_id.write().expect("lock");
            panic!("poison device registry");
        })
        .join();

        let err = store
            .register_device_id(UniqueId::from_u64(6))
            .expect_err("poisoned");
        assert!(matches!(err, TrakrError::Storage { .. }));
        assert_eq!(store.device_id(), None);
    }
}
