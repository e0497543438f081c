use std::sync::atomic::{AtomicBool, Ordering};

use jobtrakr_store::{
    AllocationError, DbStatus, JobData, JobStore, NamespaceId, TrakrConfig, TrakrError, TrakrStore,
};
use sea_orm::ConnectionTrait;
use sea_orm::sea_query::{Alias, Expr, Func, InsertStatement, Query};
use tempfile::tempdir;

async fn fresh_store(base: &std::path::Path) -> TrakrStore {
    let config = TrakrConfig::default_sqlite(base.join("rows.db").to_string_lossy());
    TrakrStore::connect(&config, base).await.expect("connect")
}

fn job_insert(id: i64, customer_id: Option<i64>) -> InsertStatement {
    Query::insert()
        .into_table(Alias::new("jobs"))
        .columns([Alias::new("id"), Alias::new("name"), Alias::new("customer_id")])
        .values_panic([id.into(), "Garage".into(), customer_id.into()])
        .to_owned()
}

async fn job_count(store: &TrakrStore) -> i64 {
    let select = Query::select()
        .expr_as(Func::count(Expr::col(Alias::new("id"))), Alias::new("n"))
        .from(Alias::new("jobs"))
        .to_owned();
    let row = store.fetch_one(&select).await.expect("count").expect("row");
    row.try_get("", "n").expect("n")
}

#[tokio::test]
async fn committed_row_uses_the_allocated_id() {
    let dir = tempdir().expect("tempdir");
    let store = fresh_store(dir.path()).await;
    let ns = NamespaceId(7);

    let id = store
        .create_row(ns, |id| job_insert(id.to_i64(), Some(1)))
        .await
        .expect("create");
    assert_eq!(id.namespace(), ns);
    assert_eq!(id.sequence(), 1);

    let jobs = JobStore::new(store.clone(), ns).fetch_all_jobs().await;
    assert_eq!(jobs.status, DbStatus::Success);
    assert_eq!(jobs.items.len(), 1);
    assert_eq!(jobs.items[0].id, Some(id));
}

#[tokio::test]
async fn failed_allocation_skips_the_insert() {
    let dir = tempdir().expect("tempdir");
    let store = fresh_store(dir.path()).await;
    store
        .connection()
        .expect("conn")
        .execute_unprepared("DROP TABLE jobtrakr_ids")
        .await
        .expect("drop id table");

    let insert_built = AtomicBool::new(false);
    let result = store
        .create_row(NamespaceId(1), |id| {
            insert_built.store(true, Ordering::SeqCst);
            job_insert(id.to_i64(), Some(1))
        })
        .await;

    assert!(matches!(
        result,
        Err(TrakrError::Allocation(AllocationError::Insert { .. }))
    ));
    assert!(!insert_built.load(Ordering::SeqCst));
    assert_eq!(job_count(&store).await, 0);

    let created = JobStore::new(store.clone(), NamespaceId(1))
        .create_job(&JobData {
            customer_id: 1,
            ..JobData::default()
        })
        .await;
    assert_eq!(created.status, DbStatus::Error);
    assert_eq!(created.id, None);
}

#[tokio::test]
async fn failed_insert_rolls_back_the_whole_unit() {
    let dir = tempdir().expect("tempdir");
    let store = fresh_store(dir.path()).await;
    let ns = NamespaceId(2);

    // customer_id is NOT NULL
    let result = store.create_row(ns, |id| job_insert(id.to_i64(), None)).await;
    assert!(matches!(result, Err(TrakrError::Insert { .. })));
    assert_eq!(job_count(&store).await, 0);

    let next = store
        .create_row(ns, |id| job_insert(id.to_i64(), Some(5)))
        .await
        .expect("create after rollback");
    assert_eq!(next.namespace(), ns);
    assert_eq!(job_count(&store).await, 1);
}

#[tokio::test]
async fn duplicate_key_from_a_stale_id_is_an_insert_failure() {
    let dir = tempdir().expect("tempdir");
    let store = fresh_store(dir.path()).await;
    let ns = NamespaceId(4);
    let first = store
        .create_row(ns, |id| job_insert(id.to_i64(), Some(1)))
        .await
        .expect("first");

    let result = store
        .create_row(ns, |_| job_insert(first.to_i64(), Some(1)))
        .await;
    assert!(matches!(result, Err(TrakrError::Insert { .. })));
    assert_eq!(job_count(&store).await, 1);
}

#[tokio::test]
async fn changes_report_no_changes_for_missing_rows() {
    let dir = tempdir().expect("tempdir");
    let store = fresh_store(dir.path()).await;
    let delete = Query::delete()
        .from_table(Alias::new("jobs"))
        .and_where(Expr::col(Alias::new("id")).eq(12345))
        .to_owned();
    assert_eq!(
        store.apply_change(&delete).await.expect("delete"),
        DbStatus::NoChanges
    );

    store.close().await.expect("close");
    assert!(matches!(
        store.apply_change(&delete).await,
        Err(TrakrError::Unavailable { .. })
    ));
}

#[tokio::test]
async fn failed_change_rolls_back_and_frees_the_store() {
    let dir = tempdir().expect("tempdir");
    let store = fresh_store(dir.path()).await;
    let ns = NamespaceId(6);
    store
        .create_row(ns, |id| job_insert(id.to_i64(), Some(1)))
        .await
        .expect("create");

    // customer_id is NOT NULL
    let update = Query::update()
        .table(Alias::new("jobs"))
        .values([(Alias::new("customer_id"), Option::<i64>::None.into())])
        .to_owned();
    assert!(matches!(
        store.apply_change(&update).await,
        Err(TrakrError::Storage { .. })
    ));

    let rename = Query::update()
        .table(Alias::new("jobs"))
        .values([(Alias::new("name"), "Shed".into())])
        .to_owned();
    assert_eq!(
        store.apply_change(&rename).await.expect("rename"),
        DbStatus::Success
    );
    store
        .create_row(ns, |id| job_insert(id.to_i64(), Some(2)))
        .await
        .expect("create after failed change");
    assert_eq!(job_count(&store).await, 2);
}

