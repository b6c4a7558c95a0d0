//! Optimizer configuration
//!
//! Controls which optimization passes run and how their diagnostics are
//! surfaced. Missing keys fall back to defaults.
//!
//! # Example
//!
//! ```toml
//! silence_errors = false
//! emit_ast = true
//! log_level = "debug"
//!
//! [passes]
//! literal_inliner = true
//! ```
//!
//! # Usage
//!
//! ```rust
//! use capsule_opt::util::config::OptimizeConfig;
//!
//! let config = OptimizeConfig::from_toml_str("emit_ast = true").unwrap();
//! assert!(config.emit_ast);
//! assert!(config.passes.literal_inliner);
//! ```

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::util::logger::LogLevel;

/// Optimizer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeConfig {
    /// Pass toggles
    #[serde(default)]
    pub passes: PassConfig,
    /// Collect diagnostics without emitting them
    #[serde(default)]
    pub silence_errors: bool,
    /// Log the optimized tree as JSON at debug level
    #[serde(default)]
    pub emit_ast: bool,
    /// Logger level used by `logger::init_from_config`
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            passes: PassConfig::default(),
            silence_errors: false,
            emit_ast: false,
            log_level: LogLevel::Info,
        }
    }
}

/// Pass toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassConfig {
    /// Literal inlining and enum flattening
    #[serde(default = "default_true")]
    pub literal_inliner: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            literal_inliner: true,
        }
    }
}

impl OptimizeConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::ParseError)
    }

    /// Load configuration from a file
    /// Returns default config if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(ConfigError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a file
    pub fn save(
        &self,
        path: &Path,
    ) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;
        fs::write(path, content).map_err(ConfigError::IoError)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),

    #[error("Config parse error: {0}")]
    ParseError(toml::de::Error),

    #[error("Config serialize error: {0}")]
    SerializeError(toml::ser::Error),
}
