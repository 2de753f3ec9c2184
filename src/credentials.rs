//! Bearer token storage.
//!
//! The client holds at most one token at a time. [`FileCredentialStore`]
//! persists it across runs under the `auth_token` key; [`MemoryCredentialStore`]
//! keeps it for the lifetime of the process.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::constants::storage::TOKEN_KEY;
use crate::error::{Error, Result};

/// Get/set/clear access to the active bearer token.
pub trait CredentialStore: Send + Sync {
    /// The stored token, if any.
    fn token(&self) -> Option<String>;

    /// Replace the stored token.
    fn set_token(&self, token: &str) -> Result<()>;

    /// Forget the stored token.
    fn clear(&self) -> Result<()>;

    /// Whether a token is present.
    fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn set_token(&self, token: &str) -> Result<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| Error::from("credential store lock poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| Error::from("credential store lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}

/// Token store backed by a small JSON file.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store the token at `path`. Nothing is read or written until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let text = fs_err::read_to_string(&self.path).map_err(|e| Error::io(e, self.path.clone()))?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(Error::parse("credential file is not a JSON object", self.path.clone())),
            Err(e) => Err(Error::parse(e.to_string(), self.path.clone())),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs_err::create_dir_all(parent).map_err(|e| Error::io(e, parent.to_path_buf()))?;
        }
        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::parse(e.to_string(), self.path.clone()))?;
        fs_err::write(&self.path, text).map_err(|e| Error::io(e, self.path.clone()))
    }
}

impl CredentialStore for FileCredentialStore {
    fn token(&self) -> Option<String> {
        match self.read_entries() {
            Ok(entries) => entries.get(TOKEN_KEY).and_then(Value::as_str).map(String::from),
            Err(e) => {
                tracing::warn!("Ignoring unreadable credential file: {e}");
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut entries = self.read_entries().unwrap_or_default();
        entries.remove(TOKEN_KEY);
        if entries.is_empty() {
            fs_err::remove_file(&self.path).map_err(|e| Error::io(e, self.path.clone()))
        } else {
            self.write_entries(&entries)
        }
    }
}
