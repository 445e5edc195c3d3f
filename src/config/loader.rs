//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use super::{paths, schema::Config};
use crate::layout::LabelVerbosity;
use anyhow::{Context, Result};
use std::path::Path;

pub const COMPUTE_ONLY_ENV: &str = "AZGRAPH_COMPUTE_ONLY";
pub const EXCLUDE_ENV: &str = "AZGRAPH_EXCLUDE";
pub const LABEL_VERBOSITY_ENV: &str = "AZGRAPH_LABEL_VERBOSITY";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Root config file
    /// 3. Built-in defaults
    ///
    /// CLI flags are applied on top by the caller.
    pub fn load() -> Result<Config> {
        let root = paths::root_config_path();
        let config = if root.exists() {
            Self::load_file(&root)?
        } else {
            tracing::debug!("No config file at {}, using defaults", root.display());
            Self::load_defaults()
        };

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // An empty file is a valid, all-defaults configuration
        if contents.trim().is_empty() {
            return Ok(Self::load_defaults());
        }

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration by loading it and compiling the filter
    ///
    /// Fails on invalid YAML, unknown keys, wrong value types and filter
    /// settings the filter engine rejects.
    pub fn validate() -> Result<Config> {
        let config = Self::load().context("Failed to load merged configuration")?;
        crate::filter::FilterEngine::new(&config.filter)
            .context("Invalid filter configuration")?;
        Ok(config)
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Apply environment variable overrides
    pub(crate) fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(compute_only) = std::env::var(COMPUTE_ONLY_ENV) {
            match compute_only.parse::<bool>() {
                Ok(val) => config.filter.compute_only = val,
                Err(_) => tracing::warn!(
                    "Ignoring {}={}: expected 'true' or 'false'",
                    COMPUTE_ONLY_ENV,
                    compute_only
                ),
            }
        }

        if let Ok(exclude) = std::env::var(EXCLUDE_ENV) {
            config.filter.exclude_patterns = split_list(&exclude);
        }

        if let Ok(verbosity) = std::env::var(LABEL_VERBOSITY_ENV) {
            match verbosity.parse::<LabelVerbosity>() {
                Ok(val) => config.layout.label_verbosity = val,
                Err(e) => tracing::warn!("Ignoring {}: {}", LABEL_VERBOSITY_ENV, e),
            }
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}

/// Comma-separated list with blanks removed
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
