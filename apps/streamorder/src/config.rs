//! # Configuration
//!
//! Layered settings: built-in defaults, then an optional TOML file, then
//! command-line flags.
//!
//! ```toml
//! [engine]
//! default = "shreve-iterative"
//! max_recursion_depth = 1024
//! confluence_rule = "top-two"
//!
//! [logging]
//! format = "json"
//! filter = "streamorder=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use streamorder_core::primitives::MAX_RECURSION_DEPTH;
use streamorder_core::{ConfluenceRule, EngineKind, EngineSettings, StreamOrderError};

/// File picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "streamorder.toml";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// CONFIG SECTIONS
// =============================================================================

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// `[engine]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Engine used when `--engine` is not given.
    pub default: EngineKind,
    /// Recursion bound for the recursive engines.
    pub max_recursion_depth: usize,
    /// Shreve combine rule.
    pub confluence_rule: ConfluenceRule,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default: EngineKind::default(),
            max_recursion_depth: MAX_RECURSION_DEPTH,
            confluence_rule: ConfluenceRule::default(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: Option<String>,
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Parse a config document.
    pub fn from_toml(text: &str) -> Result<Self, StreamOrderError> {
        toml::from_str(text)
            .map_err(|e| StreamOrderError::DeserializationError(format!("Invalid config: {}", e)))
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, StreamOrderError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            StreamOrderError::IoError(format!(
                "Cannot read config '{}': {}",
                path.display(),
                e
            ))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(StreamOrderError::IoError(format!(
                "Config '{}' exceeds {} bytes",
                path.display(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            StreamOrderError::IoError(format!(
                "Cannot read config '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&text)
    }

    /// Load the explicit config file, or `streamorder.toml` if it exists,
    /// or fall back to defaults.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, StreamOrderError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(&fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Engine settings after applying command-line overrides.
    #[must_use]
    pub fn settings(
        &self,
        rule: Option<ConfluenceRule>,
        max_depth: Option<usize>,
    ) -> EngineSettings {
        EngineSettings {
            max_recursion_depth: max_depth.unwrap_or(self.engine.max_recursion_depth),
            confluence_rule: rule.unwrap_or(self.engine.confluence_rule),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
