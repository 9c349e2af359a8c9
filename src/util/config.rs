//! Configuration file support for ferry.
//!
//! ferry reads two configuration file locations:
//! - Global: `~/.ferry/config.toml` - User-wide defaults
//! - Project: `<source>/.ferry/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// ferry configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default option overrides (`shared = true`)
    pub options: BTreeMap<String, toml::Value>,

    /// Platform setting overrides (`build_type = "Debug"`)
    pub settings: BTreeMap<String, String>,

    /// Build settings
    pub build: BuildConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build directory, relative to the source tree
    pub build_dir: Option<PathBuf>,

    /// Install prefix, relative to the build directory
    pub prefix: Option<PathBuf>,

    /// CMake generator (e.g. "Ninja")
    pub generator: Option<String>,

    /// Number of parallel jobs (None = let the generator decide)
    pub jobs: Option<usize>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        self.options.extend(other.options);
        self.settings.extend(other.settings);

        if other.build.build_dir.is_some() {
            self.build.build_dir = other.build.build_dir;
        }
        if other.build.prefix.is_some() {
            self.build.prefix = other.build.prefix;
        }
        if other.build.generator.is_some() {
            self.build.generator = other.build.generator;
        }
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
    }

    /// Option overrides as `name=value` assignments.
    ///
    /// Values are rendered as text and validated later like any other
    /// override, so a bad value in a config file is reported the same way as
    /// a bad `-o` flag.
    pub fn option_assignments(&self) -> Vec<String> {
        self.options
            .iter()
            .map(|(name, value)| {
                let raw = match value {
                    toml::Value::Boolean(true) => "True".to_string(),
                    toml::Value::Boolean(false) => "False".to_string(),
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                format!("{}={}", name, raw)
            })
            .collect()
    }

    /// Setting overrides as `key=value` assignments.
    pub fn setting_assignments(&self) -> Vec<String> {
        self.settings
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.ferry/config.toml)
/// 2. Global config (~/.ferry/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global ferry config directory (~/.ferry).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".ferry"))
}

/// Get the global config path (~/.ferry/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (<source>/.ferry/config.toml).
pub fn project_config_path(source_dir: &Path) -> PathBuf {
    source_dir.join(".ferry").join("config.toml")
}
