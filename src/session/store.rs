//! Token Store
//!
//! Durable holder for the access/refresh token pair. The pair is written and
//! cleared as a unit; readers get each half independently.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Access and refresh credentials issued by the auth endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived credential sent as a bearer token
    pub access: String,
    /// Longer-lived credential exchanged for a new access token
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

/// Errors raised by token store backends
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored content could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An in-memory lock was poisoned by a panicking writer
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for token store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent key-value holder for the token pair.
///
/// A single writer is assumed; implementations do not coordinate between
/// processes.
pub trait TokenStore: Send + Sync {
    /// Persist both halves of the pair
    fn save(&self, pair: &TokenPair) -> StoreResult<()>;

    /// Current access token, if any
    fn access(&self) -> StoreResult<Option<String>>;

    /// Current refresh token, if any
    fn refresh(&self) -> StoreResult<Option<String>>;

    /// Remove both tokens
    fn clear(&self) -> StoreResult<()>;

    /// Authenticated iff an access token is present
    fn is_authenticated(&self) -> bool {
        matches!(self.access(), Ok(Some(_)))
    }
}

/// On-disk and in-memory layout: one optional string per key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
}

impl From<&TokenPair> for StoredTokens {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access: Some(pair.access.clone()),
            refresh: Some(pair.refresh.clone()),
        }
    }
}

/// Token store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pair already stored
    pub fn with_pair(pair: &TokenPair) -> Self {
        Self {
            tokens: RwLock::new(StoredTokens::from(pair)),
        }
    }

    /// Store only an access token, leaving refresh absent
    pub fn with_access_only(access: impl Into<String>) -> Self {
        Self {
            tokens: RwLock::new(StoredTokens {
                access: Some(access.into()),
                refresh: None,
            }),
        }
    }

    fn read(&self) -> StoreResult<StoredTokens> {
        self.tokens
            .read()
            .map(|t| t.clone())
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, pair: &TokenPair) -> StoreResult<()> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        *tokens = StoredTokens::from(pair);
        Ok(())
    }

    fn access(&self) -> StoreResult<Option<String>> {
        Ok(self.read()?.access)
    }

    fn refresh(&self) -> StoreResult<Option<String>> {
        Ok(self.read()?.refresh)
    }

    fn clear(&self) -> StoreResult<()> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        *tokens = StoredTokens::default();
        Ok(())
    }
}

/// Token store backed by a JSON file keyed `access` / `refresh`.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// reader never observes half a pair.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<StoredTokens> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(StoredTokens::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredTokens::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, tokens: &StoredTokens) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(tokens)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, pair: &TokenPair) -> StoreResult<()> {
        self.write(&StoredTokens::from(pair))?;
        tracing::debug!("Saved session tokens to {:?}", self.path);
        Ok(())
    }

    fn access(&self) -> StoreResult<Option<String>> {
        Ok(self.load()?.access)
    }

    fn refresh(&self) -> StoreResult<Option<String>> {
        Ok(self.load()?.refresh)
    }

    fn clear(&self) -> StoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Cleared session tokens at {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(!store.is_authenticated());

        store.save(&TokenPair::new("a1", "r1")).unwrap();
        assert_eq!(store.access().unwrap().as_deref(), Some("a1"));
        assert_eq!(store.refresh().unwrap().as_deref(), Some("r1"));
        assert!(store.is_authenticated());

        store.clear().unwrap();
        assert_eq!(store.access().unwrap(), None);
        assert_eq!(store.refresh().unwrap(), None);
    }

    #[test]
    fn test_access_only_has_no_refresh() {
        let store = MemoryTokenStore::with_access_only("a1");
        assert!(store.is_authenticated());
        assert_eq!(store.refresh().unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session").join("tokens.json");

        FileTokenStore::new(&path)
            .save(&TokenPair::new("a1", "r1"))
            .unwrap();

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.access().unwrap().as_deref(), Some("a1"));
        assert_eq!(reopened.refresh().unwrap().as_deref(), Some("r1"));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["access"], "a1");
        assert_eq!(raw["refresh"], "r1");
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("absent.json"));

        assert_eq!(store.access().unwrap(), None);
        assert!(!store.is_authenticated());
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_clear_removes_both() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));

        store.save(&TokenPair::new("a1", "r1")).unwrap();
        store.clear().unwrap();

        assert_eq!(store.access().unwrap(), None);
        assert_eq!(store.refresh().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileTokenStore::new(&path).access().unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
