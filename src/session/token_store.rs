//! Persistent storage for the session token.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// File name the token is stored under in the data directory.
pub const TOKEN_KEY: &str = "perpx_token";

/// Keeps the session token in a single file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory.
    pub fn in_data_dir() -> Result<Self> {
        Ok(Self::new(crate::config::data_dir()?.join(TOKEN_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token. A missing or blank file means no token.
    pub fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist `token`, replacing any previous one.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    /// Remove the stored token. Clearing an empty store is not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub(crate) fn temp_store() -> TokenStore {
    TokenStore::new(
        std::env::temp_dir()
            .join(format!("perpx-session-{}", uuid::Uuid::new_v4()))
            .join(TOKEN_KEY),
    )
}
