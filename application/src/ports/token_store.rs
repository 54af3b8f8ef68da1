//! Token store port
//!
//! Durable client-side storage for the opaque auth token. Reads and writes
//! are synchronous, like browser local storage.

use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur while persisting the token
#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("Token storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable storage for the auth token
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Persist `token`, replacing any previous one
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Forget the stored token. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// In-process token store for tests and `--ephemeral` sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already stored
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
