use crate::utils::cache_file_name;
use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Persistent key/value area the snapshot cache writes into
pub trait Storage: Send + Sync {
    /// Bytes stored under `key`, or `None` if nothing is stored
    fn read(&self, key: &str) -> impl Future<Output = io::Result<Option<Vec<u8>>>> + Send;

    /// Replace the bytes under `key`. Readers see either the old or the new
    /// bytes, never a partial write.
    fn write(&self, key: &str, bytes: &[u8]) -> impl Future<Output = io::Result<()>> + Send;

    /// Remove `key`; succeeds if it was already absent
    fn delete(&self, key: &str) -> impl Future<Output = io::Result<()>> + Send;

    fn exists(&self, key: &str) -> impl Future<Output = bool> + Send;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(cache_file_name(key))
    }
}

impl Storage for FileStorage {
    async fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        // rename is atomic within one directory
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }
        ::log::trace!("Replaced {}", path.display());
        Ok(())
    }

    async fn delete(&self, key: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn exists(&self, key: &str) -> bool {
        let path = self.path_for(key);
        match tokio::fs::try_exists(&path).await {
            Ok(found) => found,
            Err(e) => {
                ::log::warn!("Could not check {}: {}", path.display(), e);
                false
            }
        }
    }
}

/// In-process storage, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> io::Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.entries.lock().await.contains_key(key)
    }
}
