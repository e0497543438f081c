use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use jobtrakr_core::{TrakrError, TrakrResult};

const DEFAULT_CONFIG_NAME: &str = "jobtrakr.json";
pub(crate) const DEFAULT_DB_NAME: &str = "jobdb.db";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum DatabaseConfig {
    Sqlite { path: Option<String> },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolConfig {
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_ms: Option<u64>,
    pub acquire_timeout_ms: Option<u64>,
    pub idle_timeout_ms: Option<u64>,
}

/// Where [`crate::DbLogger`] sends its messages.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "sink", rename_all = "lowercase")]
pub enum LogSinkConfig {
    Console,
    File { path: String },
    Remote {
        endpoint: String,
        /// Records buffered for the uploader before new ones are dropped.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        capacity: Option<usize>,
    },
    Store,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrakrConfig {
    pub database: DatabaseConfig,
    pub pool: Option<PoolConfig>,
    pub log_sink: Option<LogSinkConfig>,
}

impl TrakrConfig {
    pub fn default_sqlite(path: impl Into<String>) -> Self {
        Self {
            database: DatabaseConfig::Sqlite {
                path: Some(path.into()),
            },
            pool: None,
            log_sink: Some(LogSinkConfig::Console),
        }
    }

    pub fn load_or_init(base_dir: &Path, default_sqlite_path: &Path) -> TrakrResult<Self> {
        fs::create_dir_all(base_dir)
            .map_err(|err| TrakrError::storage(format!("create config dir: {err}")))?;
        let config_path = base_dir.join(DEFAULT_CONFIG_NAME);
        if config_path.exists() {
            let raw = fs::read_to_string(&config_path)
                .map_err(|err| TrakrError::storage(format!("read config: {err}")))?;
            let config: TrakrConfig = serde_json::from_str(&raw).map_err(|err| {
                TrakrError::invalid(format!("{}: {err}", config_path.display()))
            })?;
            config.validate()?;
            return Ok(config);
        }
        let default = TrakrConfig::default_sqlite(default_sqlite_path.to_string_lossy());
        let payload = serde_json::to_string_pretty(&default)
            .map_err(|err| TrakrError::storage(format!("serialize config: {err}")))?;
        fs::write(&config_path, payload)
            .map_err(|err| TrakrError::storage(format!("write config: {err}")))?;
        Ok(default)
    }

    /// Rejects settings that would only fail once the store or logger is in use.
    pub fn validate(&self) -> TrakrResult<()> {
        match &self.database {
            DatabaseConfig::Sqlite { path: Some(path) } if path.trim().is_empty() => {
                return Err(TrakrError::invalid("sqlite path is empty"));
            }
            _ => {}
        }
        match self.log_sink() {
            LogSinkConfig::File { path } if path.trim().is_empty() => {
                Err(TrakrError::invalid("file log sink needs a path"))
            }
            LogSinkConfig::Remote { endpoint, .. } if endpoint.trim().is_empty() => {
                Err(TrakrError::invalid("remote log sink needs an endpoint"))
            }
            LogSinkConfig::Remote {
                capacity: Some(0), ..
            } => Err(TrakrError::invalid("remote log sink capacity must be positive")),
            _ => Ok(()),
        }
    }

    pub fn sqlite_path(&self, base_dir: &Path) -> PathBuf {
        match &self.database {
            DatabaseConfig::Sqlite { path } => {
                let path = path.clone().unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
                let candidate = PathBuf::from(path);
                if candidate.is_absolute() {
                    candidate
                } else {
                    base_dir.join(candidate)
                }
            }
        }
    }

    pub fn connection_url(&self, base_dir: &Path) -> String {
        format!("sqlite://{}?mode=rwc", self.sqlite_path(base_dir).display())
    }

    pub fn log_sink(&self) -> LogSinkConfig {
        self.log_sink.clone().unwrap_or(LogSinkConfig::Console)
    }
}
