use std::collections::HashSet;

use jobtrakr_store::allocator::ensure_id_table;
use jobtrakr_store::{
    AllocationError, NamespaceId, StoreState, TrakrConfig, TrakrStore, UniqueId, build_unique_id,
};
use tempfile::tempdir;

async fn fresh_store(base: &std::path::Path) -> TrakrStore {
    let config = TrakrConfig::default_sqlite(base.join("ids.db").to_string_lossy());
    TrakrStore::connect(&config, base).await.expect("connect")
}

#[tokio::test]
async fn first_ids_in_namespace_seven() {
    let dir = tempdir().expect("tempdir");
    let store = fresh_store(dir.path()).await;
    let ns = NamespaceId(7);

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(store.build_unique_id(ns).await.expect("id"));
    }
    let base = 7u64 << 32;
    assert_eq!(
        ids.iter().map(|id| id.as_u64()).collect::<Vec<_>>(),
        vec![base + 1, base + 2, base + 3]
    );
    assert_eq!(ids[0].as_u64(), 30_064_771_073);
    assert!(ids.iter().all(|id| id.namespace() == ns));
    assert_eq!(store.current_sequence().await.expect("seq"), Some(3));
}

#[tokio::test]
async fn namespace_zero_yields_plain_sequence() {
    let dir = tempdir().expect("tempdir");
    let store = fresh_store(dir.path()).await;
    let id = store.build_unique_id(NamespaceId(0)).await.expect("id");
    assert_eq!(id, UniqueId::from_u64(1));
}

#[tokio::test]
async fn sequence_is_shared_across_namespaces() {
    let dir = tempdir().expect("tempdir");
    let store = fresh_store(dir.path()).await;
    let a = store.build_unique_id(NamespaceId(1)).await.expect("a");
    let b = store.build_unique_id(NamespaceId(2)).await.expect("b");
    let c = store.build_unique_id(NamespaceId(1)).await.expect("c");
    assert_ne!(a, b);
    assert!(b.sequence() > a.sequence());
    assert!(c > a);
    assert_eq!(c.sequence(), 3);
}

#[tokio::test]
async fn recreating_the_id_table_keeps_the_counter() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path();
    let store = fresh_store(base).await;
    let ns = NamespaceId(3);
    for _ in 0..3 {
        store.build_unique_id(ns).await.expect("id");
    }

    let conn = store.connection().expect("conn");
    ensure_id_table(&conn).await.expect("ensure table");
    store.ensure_schema().await.expect("ensure schema");
    assert_eq!(store.build_unique_id(ns).await.expect("id").sequence(), 4);

    store.close().await.expect("close");
    let reopened = fresh_store(base).await;
    assert_eq!(reopened.build_unique_id(ns).await.expect("id").sequence(), 5);
}

#[tokio::test]
async fn allocation_inside_a_transaction_sees_fresh_values() {
    let dir = tempdir().expect("tempdir");
    let store = fresh_store(dir.path()).await;
    let tx = store.begin_exclusive().await.expect("tx");
    let first = build_unique_id(&*tx, NamespaceId(9)).await.expect("first");
    let second = build_unique_id(&*tx, NamespaceId(9)).await.expect("second");
    tx.commit().await.expect("commit");
    assert!(second > first);
}

#[tokio::test]
async fn store_that_is_not_useable_refuses_to_allocate() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path();
    let config = TrakrConfig::default_sqlite(base.join("ids.db").to_string_lossy());

    let opened = TrakrStore::open(&config, base).await.expect("open");
    assert_eq!(opened.state(), StoreState::Open);
    assert_eq!(
        opened.build_unique_id(NamespaceId(1)).await,
        Err(AllocationError::StoreClosed)
    );

    opened.ensure_schema().await.expect("schema");
    assert!(opened.is_useable());
    opened.build_unique_id(NamespaceId(1)).await.expect("id");

    opened.close().await.expect("close");
    opened.close().await.expect("close twice");
    assert_eq!(opened.state(), StoreState::Closed);
    assert_eq!(
        opened.build_unique_id(NamespaceId(1)).await,
        Err(AllocationError::StoreClosed)
    );
    assert!(opened.ensure_schema().await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_allocations_never_collide() {
    let dir = tempdir().expect("tempdir");
    let store = fresh_store(dir.path()).await;

    let mut handles = Vec::new();
    for task in 0..8u32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for _ in 0..25 {
                ids.push(store.build_unique_id(NamespaceId(task % 2)).await.expect("id"));
            }
            ids
        }));
    }

    let mut sequences = HashSet::new();
    for handle in handles {
        let ids = handle.await.expect("join");
        for pair in ids.windows(2) {
            assert!(pair[1].sequence() > pair[0].sequence());
        }
        for id in ids {
            assert!(sequences.insert(id.sequence()));
        }
    }
    assert_eq!(sequences.len(), 200);
}
