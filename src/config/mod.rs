//! Configuration system for azgraph
//!
//! Layered configuration: built-in defaults, then `config.yaml` in the config
//! directory, then environment overrides. The CLI applies its flags last.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{CatalogConfig, Config, FilterConfig, LayoutConfig};

use anyhow::Context;

/// Keys accepted by [`get_config_value`] and [`set_config_value`]
pub const CONFIG_KEYS: &[&str] = &[
    "filter.excludePatterns",
    "filter.includeResourceGroups",
    "filter.computeOnly",
    "filter.maxDepth",
    "layout.labelVerbosity",
    "layout.showPowerState",
    "catalog.expandSubnets",
];

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &schema::Config, key: &str) -> anyhow::Result<String> {
    match key {
        "filter.excludePatterns" => yaml_list(&config.filter.exclude_patterns, key),
        "filter.includeResourceGroups" => yaml_list(&config.filter.include_resource_groups, key),
        "filter.computeOnly" => Ok(config.filter.compute_only.to_string()),
        "filter.maxDepth" => Ok(config
            .filter
            .max_depth
            .map(|d| d.to_string())
            .unwrap_or_default()),
        "layout.labelVerbosity" => Ok(config.layout.label_verbosity.to_string()),
        "layout.showPowerState" => Ok(config.layout.show_power_state.to_string()),
        "catalog.expandSubnets" => Ok(config.catalog.expand_subnets.to_string()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut schema::Config, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "filter.excludePatterns" => {
            config.filter.exclude_patterns = parse_list(value, key)?;
        }
        "filter.includeResourceGroups" => {
            config.filter.include_resource_groups = parse_list(value, key)?;
        }
        "filter.computeOnly" => {
            config.filter.compute_only = value
                .parse()
                .context("filter.computeOnly must be 'true' or 'false'")?;
        }
        "filter.maxDepth" => {
            config.filter.max_depth = if value.trim().is_empty() {
                None
            } else {
                Some(
                    value
                        .trim()
                        .parse()
                        .context("filter.maxDepth must be a non-negative number")?,
                )
            };
        }
        "layout.labelVerbosity" => {
            config.layout.label_verbosity = value
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("layout.labelVerbosity must be minimal, standard or detailed")?;
        }
        "layout.showPowerState" => {
            config.layout.show_power_state = value
                .parse()
                .context("layout.showPowerState must be 'true' or 'false'")?;
        }
        "catalog.expandSubnets" => {
            config.catalog.expand_subnets = value
                .parse()
                .context("catalog.expandSubnets must be 'true' or 'false'")?;
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}

fn yaml_list(values: &[String], key: &str) -> anyhow::Result<String> {
    serde_yaml::to_string(values).with_context(|| format!("Failed to serialize {}", key))
}

/// A YAML array (`['a', 'b']`) or a comma-separated list
fn parse_list(value: &str, key: &str) -> anyhow::Result<Vec<String>> {
    if value.trim_start().starts_with('[') {
        serde_yaml::from_str(value)
            .with_context(|| format!("{} must be a YAML array (e.g., ['a', 'b'])", key))
    } else {
        Ok(loader::split_list(value))
    }
}
