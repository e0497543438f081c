use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::DEFAULT_DB_NAME;
use crate::{TrakrConfig, TrakrStore};
use jobtrakr_core::{TrakrError, TrakrResult};

pub fn load_or_init_config(base: &Path) -> TrakrResult<TrakrConfig> {
    let default_sqlite = default_sqlite_path(base);
    TrakrConfig::load_or_init(base, &default_sqlite)
}

pub async fn open_store(base: &Path) -> TrakrResult<TrakrStore> {
    let config = load_or_init_config(base)?;
    TrakrStore::connect(&config, base).await
}

pub fn default_sqlite_path(base: &Path) -> PathBuf {
    base.join(DEFAULT_DB_NAME)
}

fn database_path(base: &Path) -> TrakrResult<PathBuf> {
    let config = load_or_init_config(base)?;
    Ok(config.sqlite_path(base))
}

/// Removes the database file named by the config in `base`. Close every store
/// on it first.
pub fn delete_database(base: &Path) -> TrakrResult<()> {
    let path = database_path(base)?;
    if !path.exists() {
        return Err(TrakrError::not_found(path.display().to_string()));
    }
    fs::remove_file(&path)
        .map_err(|err| TrakrError::storage(format!("delete {}: {err}", path.display())))?;
    info!("datastore: deleted {}", path.display());
    Ok(())
}

/// Copies the database file into `dest_dir`, creating it, and returns the new path.
pub fn copy_database_to(base: &Path, dest_dir: &Path) -> TrakrResult<PathBuf> {
    let source = database_path(base)?;
    if !source.exists() {
        return Err(TrakrError::not_found(source.display().to_string()));
    }
    fs::create_dir_all(dest_dir)
        .map_err(|err| TrakrError::storage(format!("create export dir: {err}")))?;
    let file_name = source
        .file_name()
        .ok_or_else(|| TrakrError::invalid("database path has no file name"))?;
    let target = dest_dir.join(file_name);
    fs::copy(&source, &target)
        .map_err(|err| TrakrError::storage(format!("copy {}: {err}", source.display())))?;
    info!("datastore: copied {} to {}", source.display(), target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::{copy_database_to, default_sqlite_path, delete_database, open_store};
    use jobtrakr_core::TrakrError;
    use tempfile::tempdir;

    #[tokio::test]
    async fn opens_store_with_default_config() {
        let dir = tempdir().expect("tempdir");
        let base = dir.path();
        let store = open_store(base).await.expect("open store");
        assert!(store.is_useable());
        assert!(default_sqlite_path(base).exists());
        assert!(base.join("jobtrakr.json").exists());
        store.close().await.expect("close");
    }

    #[tokio::test]
    async fn copies_then_deletes_database() {
        let dir = tempdir().expect("tempdir");
        let base = dir.path();
        let store = open_store(base).await.expect("open store");
        store.close().await.expect("close");

        let export = base.join("export");
        let copied = copy_database_to(base, &export).expect("copy");
        assert_eq!(copied, export.join("jobdb.db"));
        assert!(copied.exists());

        delete_database(base).expect("delete");
        assert!(!default_sqlite_path(base).exists());
        let err = delete_database(base).expect_err("already gone");
        assert!(matches!(err, TrakrError::NotFound { .. }));
    }
}
