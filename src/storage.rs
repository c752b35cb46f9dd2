//! Durable token storage backends.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store persists exactly one value, the bearer token, under a
//! fixed key. Whether durable storage exists at all is a capability the
//! store is handed at construction (`Option<Arc<dyn TokenStorage>>`), so the
//! session and guard logic stay testable without a real client runtime.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::StorageError;

/// Key the token is stored under. Must stay stable across releases or
/// existing sessions are lost on upgrade.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// A single-entry durable store for the bearer token.
pub trait TokenStorage: Send + Sync {
    /// Read the persisted token. Empty values read as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Remove the persisted token. Removing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self) -> Result<(), StorageError>;
}

// =============================================================================
// FILE
// =============================================================================

/// Stores the token as the sole contents of a file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(non_empty(raw.trim())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        std::fs::write(&self.path, token).map_err(|e| self.io_error(e))
    }

    fn remove(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

// =============================================================================
// MEMORY
// =============================================================================

/// In-process storage. Outlives a `SessionStore` but not the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with `token`, as if persisted by an earlier run.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(non_empty(token)) }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.lock().clone())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock() = non_empty(token);
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        *self.token.lock() = None;
        Ok(())
    }
}

fn non_empty(token: &str) -> Option<String> {
    if token.is_empty() { None } else { Some(token.to_owned()) }
}
