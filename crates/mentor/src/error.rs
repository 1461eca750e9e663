use std::path::PathBuf;

use thiserror::Error;

use crate::persistence::StoreError;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not encode the game: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("could not write the saved game: {0}")]
    Storage(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    /// Informational: there is simply nothing to restore.
    #[error("no saved game found")]
    NothingSaved,
    #[error("saved game is corrupt: {0}")]
    Corrupt(String),
    #[error("could not read the saved game: {0}")]
    Storage(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
