//! Application log destinations.
//!
//! A [`DbLogger`] wraps exactly one [`LogSink`], chosen when it is built.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use sea_orm::sea_query::Query;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{Receiver, Sender, channel};

use crate::config::{LogSinkConfig, TrakrConfig};
use crate::db::JobtrakrLog;
use crate::store::{TrakrStore, exec};
use jobtrakr_core::{TrakrError, TrakrResult};

const STORE_SINK_ATTEMPTS: u32 = 3;
const STORE_SINK_DELAY: Duration = Duration::from_millis(50);
pub const REMOTE_SINK_CAPACITY: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub logged_at: String,
    pub message: String,
}

impl LogRecord {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            logged_at: timestamp(),
            message: message.into(),
        }
    }
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string())
}

#[async_trait]
pub trait LogSink: Send + Sync {
    async fn log(&self, message: &str);
}

/// Forwards to the `log` facade under the `jobtrakr` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl LogSink for ConsoleSink {
    async fn log(&self, message: &str) {
        info!(target: "jobtrakr", "{message}");
    }
}

/// Appends `"<rfc3339> - <message>"` lines, creating the file if needed.
#[derive(Clone, Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl LogSink for FileSink {
    async fn log(&self, message: &str) {
        let line = format!("{} - {message}\n", timestamp());
        if let Err(err) = self.append(&line).await {
            warn!("logger: write {} failed: {err}", self.path.display());
        }
    }
}

/// Hands records to a host-owned uploader over a bounded channel. Records are
/// dropped while the channel is full or once the receiving side is gone.
#[derive(Clone, Debug)]
pub struct RemoteSink {
    endpoint: String,
    sender: Sender<LogRecord>,
}

impl RemoteSink {
    pub fn new(endpoint: impl Into<String>) -> (Self, Receiver<LogRecord>) {
        Self::with_capacity(endpoint, REMOTE_SINK_CAPACITY)
    }

    /// A zero capacity is raised to one.
    pub fn with_capacity(
        endpoint: impl Into<String>,
        capacity: usize,
    ) -> (Self, Receiver<LogRecord>) {
        let (sender, receiver) = channel(capacity.max(1));
        (
            Self {
                endpoint: endpoint.into(),
                sender,
            },
            receiver,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LogSink for RemoteSink {
    async fn log(&self, message: &str) {
        match self.sender.try_send(LogRecord::now(message)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("logger: uploader for {} is behind, dropped record", self.endpoint);
            }
            Err(TrySendError::Closed(_)) => {
                warn!("logger: remote uploader for {} is gone", self.endpoint);
            }
        }
    }
}

/// Writes into the `jobtrakr_log` table of the store it logs for.
#[derive(Clone)]
pub struct StoreSink {
    store: TrakrStore,
}

impl StoreSink {
    pub fn new(store: TrakrStore) -> Self {
        Self { store }
    }

    async fn insert(&self, record: &LogRecord) -> TrakrResult<()> {
        let insert = Query::insert()
            .into_table(JobtrakrLog::Table)
            .columns([JobtrakrLog::LoggedAt, JobtrakrLog::Message])
            .values_panic([
                record.logged_at.clone().into(),
                record.message.clone().into(),
            ])
            .to_owned();
        let tx = self.store.begin_exclusive().await?;
        exec(&*tx, &insert).await?;
        tx.commit().await
    }
}

#[async_trait]
impl LogSink for StoreSink {
    async fn log(&self, message: &str) {
        let record = LogRecord::now(message);
        let result = retry_transient(STORE_SINK_ATTEMPTS, STORE_SINK_DELAY, || {
            self.insert(&record)
        })
        .await;
        if let Err(err) = result {
            warn!("logger: dropped store log entry: {err}");
        }
    }
}

fn is_transient(err: &TrakrError) -> bool {
    let message = err.to_string().to_ascii_lowercase();
    message.contains("database is locked") || message.contains("busy")
}

/// Runs `op` up to `attempts` times, sleeping `delay` between tries, but only
/// while it fails with a locked/busy database.
pub(crate) async fn retry_transient<T, F, Fut>(
    attempts: u32,
    delay: Duration,
    mut op: F,
) -> TrakrResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TrakrResult<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts && is_transient(&err) => {
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[derive(Clone)]
pub struct DbLogger {
    sink: Arc<dyn LogSink>,
}

impl DbLogger {
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Builds the logger named by `config`. A remote sink also returns the
    /// receiving end of its channel for the host to drain.
    pub fn from_config(
        config: &TrakrConfig,
        base_dir: &Path,
        store: &TrakrStore,
    ) -> TrakrResult<(Self, Option<Receiver<LogRecord>>)> {
        config.validate()?;
        match config.log_sink() {
            LogSinkConfig::Console => Ok((Self::new(ConsoleSink), None)),
            LogSinkConfig::File { path } => {
                let path = PathBuf::from(path);
                let path = if path.is_absolute() {
                    path
                } else {
                    base_dir.join(path)
                };
                Ok((Self::new(FileSink::new(path)), None))
            }
            LogSinkConfig::Remote { endpoint, capacity } => {
                let capacity = capacity.unwrap_or(REMOTE_SINK_CAPACITY);
                let (sink, receiver) = RemoteSink::with_capacity(endpoint, capacity);
                Ok((Self::new(sink), Some(receiver)))
            }
            LogSinkConfig::Store => Ok((Self::new(StoreSink::new(store.clone())), None)),
        }
    }

    pub async fn log(&self, message: &str) {
        self.sink.log(message).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use jobtrakr_core::TrakrError;

    use super::{LogSink, RemoteSink, retry_transient};

    #[tokio::test]
    async fn retries_locked_database_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry_transient(3, Duration::from_millis(1), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(TrakrError::storage("database is locked"))
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_fixed_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_transient(3, Duration::from_millis(1), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TrakrError::storage("database is busy"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn other_failures_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_transient(3, Duration::from_millis(1), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TrakrError::invalid("bad row"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stalled_uploader_drops_instead_of_buffering() {
        let (sink, mut receiver) = RemoteSink::with_capacity("https://logs.example.invalid", 4);
        for n in 0..1_000 {
            sink.log(&format!("entry {n}")).await;
        }
        let mut buffered = Vec::new();
        while let Ok(record) = receiver.try_recv() {
            buffered.push(record.message);
        }
        assert_eq!(buffered, vec!["entry 0", "entry 1", "entry 2", "entry 3"]);

        sink.log("after drain").await;
        assert_eq!(
            receiver.try_recv().expect("record").message,
            "after drain"
        );
    }
}
