//! Bearer token storage.
//!
//! The token lives in two places: a durable [`TokenStorage`] so a restart
//! does not force a new login, and a [`SharedToken`] that the REST client
//! reads on every request. Both are updated through [`CredentialStore`] only;
//! the in-memory copy changes first so the very next request sees it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

/// Key of the token inside the durable store.
pub const TOKEN_KEY: &str = "authToken";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable backing for the token.
pub trait TokenStorage: Send + Sync {
    fn read(&self) -> Result<Option<String>, CredentialError>;
    fn write(&self, token: Option<&str>) -> Result<(), CredentialError>;
}

// ============================================================================
// FILE STORAGE
// ============================================================================

/// A small JSON object on disk, the token stored under [`TOKEN_KEY`].
///
/// Other keys in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }
}

impl TokenStorage for FileTokenStorage {
    fn read(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.read_map()?.remove(TOKEN_KEY))
    }

    fn write(&self, token: Option<&str>) -> Result<(), CredentialError> {
        let mut map = self.read_map()?;
        match token {
            Some(token) => map.insert(TOKEN_KEY.to_string(), token.to_string()),
            None => map.remove(TOKEN_KEY),
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&map)?)?;
        Ok(())
    }
}

// ============================================================================
// MEMORY STORAGE
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    value: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn read(&self) -> Result<Option<String>, CredentialError> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn write(&self, token: Option<&str>) -> Result<(), CredentialError> {
        *self
            .value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token.map(str::to_string);
        Ok(())
    }
}

// ============================================================================
// SHARED TOKEN
// ============================================================================

/// Process-wide view of the current token, cloned into the HTTP client.
#[derive(Debug, Clone, Default)]
pub struct SharedToken(Arc<RwLock<Option<String>>>);

impl SharedToken {
    pub fn get(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_present(&self) -> bool {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    fn replace(&self, token: Option<String>) {
        *self
            .0
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }
}

// ============================================================================
// STORE
// ============================================================================

pub struct CredentialStore {
    storage: Box<dyn TokenStorage>,
    current: SharedToken,
}

impl CredentialStore {
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self {
            storage,
            current: SharedToken::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryTokenStorage::new()))
    }

    /// Handle for the HTTP client; reflects every later set/clear.
    pub fn shared(&self) -> SharedToken {
        self.current.clone()
    }

    /// Read the durable copy once at startup.
    pub fn load(&self) -> Result<Option<String>, CredentialError> {
        let token = self.storage.read()?;
        self.current.replace(token.clone());
        tracing::info!(present = token.is_some(), "credential store loaded");
        Ok(token)
    }

    pub fn set_token(&self, token: impl Into<String>) -> Result<(), CredentialError> {
        let token = token.into();
        self.current.replace(Some(token.clone()));
        self.storage.write(Some(&token))?;
        tracing::debug!("bearer token stored");
        Ok(())
    }

    pub fn clear_token(&self) -> Result<(), CredentialError> {
        self.current.replace(None);
        self.storage.write(None)?;
        tracing::debug!("bearer token cleared");
        Ok(())
    }

    pub fn get_token(&self) -> Option<String> {
        self.current.get()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("token_present", &self.current.is_present())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trips_through_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let store = CredentialStore::new(Box::new(FileTokenStorage::new(&path)));
        assert_eq!(store.load().unwrap(), None);
        store.set_token("abc").unwrap();

        let restarted = CredentialStore::new(Box::new(FileTokenStorage::new(&path)));
        assert_eq!(restarted.load().unwrap().as_deref(), Some("abc"));
        assert_eq!(restarted.get_token().as_deref(), Some("abc"));
    }

    #[test]
    fn file_storage_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let storage = FileTokenStorage::new(&path);
        storage.write(Some("t")).unwrap();
        storage.write(None).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("theme"));
        assert!(!contents.contains(TOKEN_KEY));
    }

    #[test]
    fn shared_handle_observes_clear_immediately() {
        let store = CredentialStore::in_memory();
        let shared = store.shared();
        store.set_token("t1").unwrap();
        assert_eq!(shared.get().as_deref(), Some("t1"));

        store.clear_token().unwrap();
        assert!(shared.get().is_none());
        assert!(store.get_token().is_none());
    }

    #[test]
    fn debug_output_hides_token() {
        let store = CredentialStore::new(Box::new(MemoryTokenStorage::with_token("secret-token")));
        store.load().unwrap();
        let rendered = format!("{store:?}");
        assert!(!rendered.contains("secret-token"));
    }
}
