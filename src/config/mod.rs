//! Configuration system for keyquill.
//!
//! This module provides the configuration structure for keyquill with sensible
//! defaults and support for serialization/deserialization via serde.
//! Configuration is loaded from a TOML file and applied to an [`Engine`]
//! before the command line is processed.
//!
//! # Example
//!
//! ```
//! use keyquill::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert!(config.cache);
//! assert!(!config.force);
//! ```
//!
//! [`Engine`]: crate::engine::Engine

use serde::Deserialize;

use crate::engine::Engine;
use crate::syntax::{SyntaxError, SyntaxPatch};

/// Configuration for the keyquill command-line tool.
///
/// All fields have sensible defaults, so a partial config file only
/// overrides what it names.
///
/// # Fields
///
/// * `cache` - Keep tokenized programs for reuse (default: true)
/// * `force` - Create missing intermediate objects on writes (default: false)
/// * `simple` - Restrict the grammar to plain separator-split paths (default: false)
/// * `separator` - Property separator for the simple grammar (default: '.')
/// * `syntax` - Partial grammar overrides, e.g. `parent = "^"`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Keep tokenized programs for reuse
    #[serde(default = "default_cache")]
    pub cache: bool,

    /// Create missing intermediate objects on writes
    #[serde(default)]
    pub force: bool,

    /// Restrict the grammar to plain separator-split paths
    #[serde(default)]
    pub simple: bool,

    /// Property separator used when `simple` is on
    #[serde(default)]
    pub separator: Option<char>,

    /// Partial grammar overrides
    #[serde(default)]
    pub syntax: SyntaxPatch,
}

/// Returns the default for program caching.
fn default_cache() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: default_cache(),
            force: false,
            simple: false,
            separator: None,
            syntax: SyntaxPatch::default(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `<config dir>/keyquill/config.toml`, where the config dir is
    /// platform-specific (`~/.config` on Linux).
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("keyquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or
    /// can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|_| Self::default()),
            Err(_) => Self::default(),
        }
    }

    /// Builds an engine configured by this config. The simple preset is
    /// installed first so explicit syntax overrides still apply on top.
    pub fn build_engine(&self) -> Result<Engine, SyntaxError> {
        let mut engine = Engine::new();
        engine.set_cache(self.cache);
        engine.set_force(self.force);
        if self.simple {
            engine.set_simple(true, self.separator);
        }
        engine.set_options(&self.syntax)?;
        Ok(engine)
    }
}
