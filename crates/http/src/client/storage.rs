//! Durable key/value storage for the bearer credential and user record

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;

/// Key holding the bearer credential
pub const TOKEN_KEY: &str = "token";
/// Key holding the serialized user record
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Storage that survives restarts of the client.
///
/// Removing a key that is not present succeeds.
#[async_trait]
pub trait CredentialStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::{CredentialStorage, StorageError};
    use async_trait::async_trait;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};
    use tokio::fs;
    use tracing::debug;

    /// One file per key inside a directory, readable only by the owner on Unix
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

        fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
            let valid = !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return Err(StorageError::InvalidKey(key.to_string()));
            }
            Ok(self.dir.join(key))
        }
    }

    #[async_trait]
    impl CredentialStorage for FileStorage {
        async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            let path = self.path_for(key)?;
            match fs::read_to_string(&path).await {
                Ok(value) => Ok(Some(value)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        }

        async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let path = self.path_for(key)?;
            fs::create_dir_all(&self.dir).await?;

            // Write then rename so readers never see a partial value
            let staging = self.dir.join(format!(".{key}.tmp"));
            fs::write(&staging, value).await?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&staging, std::fs::Permissions::from_mode(0o600)).await?;
            }

            fs::rename(&staging, &path).await?;
            debug!(key, path = %path.display(), "stored credential item");
            Ok(())
        }

        async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            let path = self.path_for(key)?;
            match fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            }
        }
    }
}
