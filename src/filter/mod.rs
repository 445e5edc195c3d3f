//! Node and edge filtering
//!
//! [`FilterEngine`] is compiled from a [`FilterConfig`] before any resolution
//! work starts, so a bad pattern fails fast. Applying it is a pure
//! `Subgraph -> Subgraph` transformation and applying it twice changes
//! nothing.

mod pattern;
mod projection;

pub use pattern::FilterPattern;

use crate::config::FilterConfig;
use crate::graph::Subgraph;
use crate::models::ResourceKind;
use std::collections::BTreeSet;

/// Filter configuration errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FilterError {
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("computeOnly is set but the exclude patterns [{}] remove every core compute type", patterns.join(", "))]
    ComputeOnlyExcludesCore { patterns: Vec<String> },
}

/// Compiled filter configuration
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    excludes: Vec<FilterPattern>,
    /// Lowercase group names; empty keeps every group
    include_groups: BTreeSet<String>,
    compute_only: bool,
    max_depth: Option<usize>,
}

impl FilterEngine {
    /// Compile and validate a filter configuration
    pub fn new(config: &FilterConfig) -> Result<Self, FilterError> {
        let excludes = config
            .exclude_patterns
            .iter()
            .map(|pattern| FilterPattern::parse(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        if config.compute_only
            && !excludes.is_empty()
            && ResourceKind::core_compute()
                .all(|kind| excludes.iter().any(|pattern| pattern.matches(kind.as_str())))
        {
            return Err(FilterError::ComputeOnlyExcludesCore {
                patterns: excludes.iter().map(|p| p.as_str().to_string()).collect(),
            });
        }

        let include_groups = config
            .include_resource_groups
            .iter()
            .map(|group| group.trim().to_ascii_lowercase())
            .filter(|group| !group.is_empty())
            .collect();

        Ok(Self {
            excludes,
            include_groups,
            compute_only: config.compute_only,
            max_depth: config.max_depth,
        })
    }

    /// Whether a type string is removed by an exclude pattern
    pub fn is_excluded(&self, resource_type: &str) -> bool {
        self.excludes
            .iter()
            .any(|pattern| pattern.matches(resource_type))
    }

    /// Run every filtering step in order
    pub fn apply(&self, mut subgraph: Subgraph) -> Subgraph {
        let before = subgraph.nodes.len();

        if !self.include_groups.is_empty() {
            subgraph.nodes.retain(|_, resource| {
                self.include_groups
                    .contains(&resource.resource_group.to_ascii_lowercase())
            });
            subgraph.prune_dangling_edges();
        }

        if !self.excludes.is_empty() {
            subgraph
                .nodes
                .retain(|_, resource| !self.is_excluded(&resource.resource_type));
            subgraph.prune_dangling_edges();
        }

        if self.compute_only {
            if projection::core_nodes(&subgraph).is_empty() {
                tracing::warn!("Compute-only view requested but no compute resources survived");
            }
            let kept = projection::compute_only(&subgraph);
            subgraph.nodes.retain(|id, _| kept.contains(id));
            subgraph.prune_dangling_edges();
        }

        if let Some(max_depth) = self.max_depth {
            let seeds = projection::core_nodes(&subgraph);
            if seeds.is_empty() {
                tracing::warn!("Depth limit {} has no compute resources to start from", max_depth);
            }
            let kept = projection::within_depth(&subgraph, &seeds, max_depth);
            subgraph.nodes.retain(|id, _| kept.contains(id));
            subgraph.prune_dangling_edges();
        }

        tracing::info!(
            "Filtering kept {} of {} resources",
            subgraph.nodes.len(),
            before
        );
        subgraph
    }
}
