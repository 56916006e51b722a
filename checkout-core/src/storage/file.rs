//! Directory-backed slots: one `<key>.json` file per key.
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! crash mid-write leaves either the old snapshot or the new one, never a
//! truncated file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tracing::debug;

use super::{StateStorage, StorageConfig, StorageError, StorageFactory};

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Uses `dir` for slot files, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            StorageError::Connection(format!("cannot create '{}': {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    fn slot_path(
        &self,
        key: &str,
    ) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::Configuration(format!(
                "invalid slot key '{key}'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl StateStorage for FileStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let contents = value.to_string();
        tokio::task::spawn_blocking(move || atomic_write_file(&path, contents.as_bytes()))
            .await
            .map_err(|e| StorageError::Io(format!("write task failed: {e}")))??;
        debug!(key, dir = %self.dir.display(), "slot written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn atomic_write_file(
    path: &Path,
    content: &[u8],
) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::other("slot path has no parent"))?;
    let tmp_path = parent.join(format!(
        ".{}.tmp-{}-{}",
        path.file_name().and_then(|v| v.to_str()).unwrap_or("slot"),
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    ));

    {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    sync_parent_dir(parent)
}

#[cfg(unix)]
fn sync_parent_dir(parent: &Path) -> io::Result<()> {
    fs::File::open(parent)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_parent: &Path) -> io::Result<()> {
    Ok(())
}

/// [`StorageFactory`] for the `"file"` backend. The connection string is the
/// directory that holds the slot files.
pub struct FileStorageFactory;

#[async_trait]
impl StorageFactory for FileStorageFactory {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    async fn create(
        &self,
        config: &StorageConfig,
    ) -> Result<Box<dyn StateStorage>, StorageError> {
        Ok(Box::new(FileStorage::open(&config.connection_string)?))
    }
}
