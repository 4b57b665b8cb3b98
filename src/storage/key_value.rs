use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::AsyncWriteExt,
    sync::RwLock,
};
use tracing::{debug, trace};

#[cfg(test)]
use mockall::automock;

use super::error::PersistenceError;

/// Computes the next value of a key from its current value, `None` if the key was never written.
pub type UpdateFn = Box<dyn FnOnce(Option<String>) -> Result<String, PersistenceError> + Send>;

/// Interface for abstracting a local persistent key-value store.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError>;

    /// Atomic read-modify-write. No other update of `key` can run between reading the current
    /// value and storing the new one. If `apply` fails nothing is written. Returns the stored
    /// value.
    async fn update(&self, key: &str, apply: UpdateFn) -> Result<String, PersistenceError>;
}

/// The main realization of [KeyValueStore]. Every key is stored in `<dir>/<key>.json`.
///
/// Writers inside the process are serialized with an async lock, writers from other processes
/// with an exclusive lock on `<dir>/<key>.lock`. Values are written into a temporary file and
/// renamed over the old one, so a reader sees either the old or the new value.
pub struct FileKeyValueStore {
    dir: PathBuf,
    access: RwLock<()>,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            dir,
            access: RwLock::new(()),
        })
    }

    fn check_key(key: &str) -> Result<(), PersistenceError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if valid {
            Ok(())
        } else {
            Err(PersistenceError::InvalidKey(key.to_owned()))
        }
    }

    fn value_path(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        Self::check_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    async fn open_lock(&self, key: &str) -> Result<File, PersistenceError> {
        Self::check_key(key)?;
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.dir.join(format!("{key}.lock")))
            .await?;
        Ok(file)
    }

    async fn read_value(path: &Path) -> Result<Option<String>, PersistenceError> {
        trace!("Reading {path:?}");
        match tokio::fs::read_to_string(path).await {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)?,
        }
    }

    async fn write_value(path: &Path, value: &str) -> Result<(), PersistenceError> {
        let temp_path = path.with_extension("json.tmp");
        trace!("Writing {path:?} through {temp_path:?}");
        let mut file = File::create(&temp_path).await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&temp_path, path).await?;
        Ok(())
    }

    /// Holds the lock file exclusively for the duration of `action`.
    async fn with_exclusive_lock<T>(
        &self,
        key: &str,
        action: impl std::future::Future<Output = Result<T, PersistenceError>>,
    ) -> Result<T, PersistenceError> {
        let lock = self.open_lock(key).await?;
        // Semi-safe acquire-release for a file
        lock.lock_exclusive()?;
        let result = action.await;
        lock.unlock_async().await?;
        result
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.value_path(key)?;
        let _reading = self.access.read().await;
        Self::read_value(&path).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        let path = self.value_path(key)?;
        let _writing = self.access.write().await;
        self.with_exclusive_lock(key, Self::write_value(&path, &value))
            .await
    }

    async fn update(&self, key: &str, apply: UpdateFn) -> Result<String, PersistenceError> {
        let path = self.value_path(key)?;
        let _writing = self.access.write().await;
        self.with_exclusive_lock(key, async {
            let current = Self::read_value(&path).await?;
            let next = apply(current)?;
            Self::write_value(&path, &next).await?;
            debug!("Updated {key}");
            Ok(next)
        })
        .await
    }
}
