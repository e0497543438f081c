use jobtrakr_store::{
    CategoryStore, DbLogger, DbStatus, FileSink, ItemStore, JobStore, LogSink, LogSinkConfig,
    NamespaceId, RemoteSink, TrakrConfig, TrakrStore, load_or_init_config, open_store,
    seed_sample_data,
};
use sea_orm::sea_query::{Alias, Expr, Func, Query};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use tempfile::tempdir;

#[tokio::test]
async fn migrations_create_every_table() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path()).await.expect("open");
    let conn = store.connection().expect("conn");
    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        ))
        .await
        .expect("tables");
    let tables: Vec<String> = rows
        .iter()
        .map(|row| row.try_get("", "name").expect("name"))
        .collect();
    for expected in [
        "categories",
        "devices",
        "items",
        "jobs",
        "jobtrakr_ids",
        "jobtrakr_log",
        "picture_bucket",
        "receipt_bucket",
        "todos",
        "vendors",
    ] {
        assert!(tables.iter().any(|name| name == expected), "missing {expected}");
    }
}

#[tokio::test]
async fn config_round_trips_through_disk() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path();
    let mut config = load_or_init_config(base).expect("init");
    assert_eq!(config.sqlite_path(base), base.join("jobdb.db"));

    config.log_sink = Some(LogSinkConfig::File {
        path: "logs/trakr.log".to_string(),
    });
    std::fs::write(
        base.join("jobtrakr.json"),
        serde_json::to_string_pretty(&config).expect("json"),
    )
    .expect("write");
    let reloaded = load_or_init_config(base).expect("reload");
    assert_eq!(reloaded.log_sink(), config.log_sink());
}

#[tokio::test]
async fn file_sink_appends_timestamped_lines() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("logs").join("trakr.log");
    let sink = FileSink::new(&path);
    sink.log("first").await;
    sink.log("second").await;
    let contents = std::fs::read_to_string(&path).expect("read");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" - first"));
    assert!(lines[1].ends_with(" - second"));
}

#[tokio::test]
async fn remote_sink_forwards_records() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path();
    let mut config = TrakrConfig::default_sqlite(base.join("remote.db").to_string_lossy());
    config.log_sink = Some(LogSinkConfig::Remote {
        endpoint: "https://logs.example.invalid".to_string(),
        capacity: Some(8),
    });
    let store = TrakrStore::connect(&config, base).await.expect("connect");
    let (logger, receiver) = DbLogger::from_config(&config, base, &store).expect("logger");
    let mut receiver = receiver.expect("receiver");
    logger.log("uploaded").await;
    let record = receiver.recv().await.expect("record");
    assert_eq!(record.message, "uploaded");

    let (sink, _receiver) = RemoteSink::new("https://logs.example.invalid");
    assert_eq!(sink.endpoint(), "https://logs.example.invalid");
}

#[tokio::test]
async fn store_sink_writes_the_log_table() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path();
    let mut config = TrakrConfig::default_sqlite(base.join("logged.db").to_string_lossy());
    config.log_sink = Some(LogSinkConfig::Store);
    let store = TrakrStore::connect(&config, base).await.expect("connect");
    let (logger, receiver) = DbLogger::from_config(&config, base, &store).expect("logger");
    assert!(receiver.is_none());
    logger.log("job created").await;
    logger.log("job deleted").await;

    let select = Query::select()
        .expr_as(Func::count(Expr::col(Alias::new("id"))), Alias::new("n"))
        .from(Alias::new("jobtrakr_log"))
        .to_owned();
    let row = store.fetch_one(&select).await.expect("count").expect("row");
    let count: i64 = row.try_get("", "n").expect("n");
    assert_eq!(count, 2);
}

#[tokio::test]
async fn sample_data_builds_jobs_with_categories_and_items() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path()).await.expect("open");
    let ns = NamespaceId(11);
    let job_ids = seed_sample_data(&store, ns).await.expect("seed");
    assert_eq!(job_ids.len(), 2);
    assert!(job_ids.iter().all(|id| id.namespace() == ns));

    let jobs = JobStore::new(store.clone(), ns).fetch_all_jobs().await;
    assert_eq!(jobs.status, DbStatus::Success);
    assert_eq!(jobs.items.len(), 2);

    let categories = CategoryStore::new(store.clone(), ns)
        .fetch_job_categories(job_ids[0])
        .await
        .items;
    assert_eq!(categories.len(), 3);
    let first_category = categories[0].id.expect("category id");
    let items = ItemStore::new(store.clone(), ns)
        .fetch_category_items(first_category)
        .await
        .items;
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].item_name.as_deref(), Some("Permit"));
}
