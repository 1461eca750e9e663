//! `chess_mentor.toml`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use engine_session::{ProcessConnector, SessionConfig, UciSession};
use mentor_advice::{AdviceError, AdviceSource, Difficulty, GeminiAdvisor, GeminiConfig, OfflineAdvisor};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::persistence::{FileStore, DEFAULT_SAVE_KEY};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "chess_mentor.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentorConfig {
    pub difficulty: Difficulty,
    pub engine: EngineConfig,
    pub advice: AdviceConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// UCI engine binary, looked up on `PATH` when relative
    pub path: PathBuf,
    pub args: Vec<String>,
    pub search_timeout_secs: u64,
    pub init_timeout_secs: u64,
    /// `setoption` values sent after the handshake
    pub options: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockfish"),
            args: Vec::new(),
            search_timeout_secs: 30,
            init_timeout_secs: 10,
            options: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceConfig {
    pub model: String,
    pub endpoint: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            language: "English".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".chess_mentor"),
            key: DEFAULT_SAVE_KEY.to_string(),
        }
    }
}

impl MentorConfig {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Like [`MentorConfig::load`], but a missing file means defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            init_timeout: Duration::from_secs(self.engine.init_timeout_secs),
            search_timeout: Duration::from_secs(self.engine.search_timeout_secs),
            options: self
                .engine
                .options
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// The engine session; nothing is spawned until the first search.
    pub fn build_engine(&self) -> UciSession {
        let connector =
            ProcessConnector::new(self.engine.path.clone()).with_args(self.engine.args.clone());
        UciSession::new(connector, self.session_config())
    }

    pub fn gemini_config(&self, api_key: Option<String>) -> Option<GeminiConfig> {
        let api_key = api_key.filter(|k| !k.trim().is_empty())?;
        Some(GeminiConfig {
            endpoint: self.advice.endpoint.clone(),
            model: self.advice.model.clone(),
            api_key,
            timeout: Duration::from_secs(self.advice.timeout_secs),
        })
    }

    /// Gemini when the API key variable is set, otherwise offline advice.
    pub fn build_advisor(&self) -> Result<Arc<dyn AdviceSource>, AdviceError> {
        let api_key = std::env::var(&self.advice.api_key_env).ok();
        match self.gemini_config(api_key) {
            Some(config) => Ok(Arc::new(GeminiAdvisor::new(config)?)),
            None => {
                warn!(var = %self.advice.api_key_env, "no API key set, using offline advice");
                Ok(Arc::new(OfflineAdvisor))
            }
        }
    }

    pub fn build_store(&self) -> FileStore {
        FileStore::new(self.storage.dir.clone())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
