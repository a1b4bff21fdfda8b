//! Optional TOML configuration for `bdcli`.
//!
//! ```toml
//! [parse]
//! default_language = "text"
//!
//! [output]
//! pretty = true
//! sequential_ids = false
//! ```
//!
//! Every field is optional.

use std::path::{Path, PathBuf};

use blockdown_core::parser::DEFAULT_LANGUAGE;
use blockdown_core::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parse: ParseConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Language recorded for fences without an info string.
    pub default_language: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Number ids `id-1`, `id-2`, ... instead of random UUIDs.
    pub sequential_ids: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            sequential_ids: false,
        }
    }
}

impl Config {
    /// Load a config file. `Ok(None)` when the file does not exist.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Some(config))
    }

    /// Load `path` if given, falling back to defaults when it is absent
    /// or does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match Self::load_from_path(path)? {
            Some(config) => Ok(config),
            None => {
                warn!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn parser(&self) -> Parser {
        Parser::new().with_default_language(self.parse.default_language.as_str())
    }
}
