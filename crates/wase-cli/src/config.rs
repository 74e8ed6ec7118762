//! # Config
//!
//! Optional TOML file. Only read when present; command-line flags take
//! precedence over its values.
//!
//! ```toml
//! [engine]
//! servers = ["es1:9200", "es2:9200"]
//! index = "wase-*"
//! scroll_page_size = 1000
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use wase_io::EngineConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Engine settings with `--server` and `--index` applied on top.
    pub fn engine_with_overrides(&self, servers: &[String], index: Option<&str>) -> EngineConfig {
        let mut engine = self.engine.clone();
        if !servers.is_empty() {
            engine.servers = servers.to_vec();
        }
        if let Some(index) = index {
            engine.index = index.to_string();
        }
        engine
    }
}
