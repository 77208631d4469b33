use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::SessionError;
use crate::models::Session;

/// Where a provider keeps the current session between calls (and restarts).
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, SessionError>;
    async fn save(&self, session: &Session) -> Result<(), SessionError>;
    async fn remove(&self) -> Result<(), SessionError>;
}

/// The storage backends, selected by a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, Default)]
#[serde(tag = "type")]
pub enum StorageConfig {
    #[default]
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "file")]
    File { path: String },
}

pub fn create_storage(config: &StorageConfig) -> Arc<dyn SessionStorage> {
    match config {
        StorageConfig::Memory => {
            info!("Session storage: in-memory (sessions are lost on restart).");
            Arc::new(MemoryStorage::new())
        }
        StorageConfig::File { path } => {
            info!("Session storage: file at '{}'.", path);
            Arc::new(FileStorage::new(path))
        }
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    session: RwLock<Option<Session>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.session.read().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn remove(&self) -> Result<(), SessionError> {
        *self.session.write().await = None;
        Ok(())
    }
}

/// Persists the session as JSON in a single file.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn load(&self) -> Result<Option<Session>, SessionError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No persisted session at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(SessionError::Storage(format!(
                    "reading {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        let session = serde_json::from_str(&contents)?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    SessionError::Storage(format!("creating {}: {}", parent.display(), e))
                })?;
            }
        }
        let contents = serde_json::to_string(session)?;
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| SessionError::Storage(format!("writing {}: {}", self.path.display(), e)))
    }

    async fn remove(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(format!(
                "removing {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
