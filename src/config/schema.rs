//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use crate::layout::LabelVerbosity;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Which resources reach the graph
    #[serde(default)]
    pub filter: FilterConfig,

    /// Labels and annotations
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Record ingestion
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Filter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FilterConfig {
    /// Wildcard patterns over resource types, e.g. `*.subnets`
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Resource groups to keep; empty keeps all
    #[serde(default)]
    pub include_resource_groups: Vec<String>,

    /// Keep compute resources and the network/storage/identity resources they use
    #[serde(default)]
    pub compute_only: bool,

    /// Maximum undirected hops from a compute resource
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Layout configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayoutConfig {
    #[serde(default)]
    pub label_verbosity: LabelVerbosity,

    /// Expose VM power state to renderers
    #[serde(default = "default_true")]
    pub show_power_state: bool,
}

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogConfig {
    /// Turn subnets embedded in virtual network records into resources of their own
    #[serde(default = "default_true")]
    pub expand_subnets: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_verbosity: LabelVerbosity::default(),
            show_power_state: default_true(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            expand_subnets: default_true(),
        }
    }
}
