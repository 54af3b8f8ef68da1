//! Session configuration from TOML (`[session]` section)

use crate::token_store::FileTokenStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw session configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Where the auth token is kept (defaults to the user data directory)
    pub token_path: Option<String>,
}

impl FileSessionConfig {
    pub fn token_path(&self) -> Option<PathBuf> {
        match &self.token_path {
            Some(path) => Some(PathBuf::from(path)),
            None => FileTokenStore::default_path(),
        }
    }
}
