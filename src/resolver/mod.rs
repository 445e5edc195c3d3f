//! Relationship inference
//!
//! Runs the [`StrategyTable`] over every catalog resource and merges the
//! candidate edges into a sorted, deduplicated list. Resolution is grouped by
//! resource group; with the `parallel` feature the groups run on the rayon
//! pool, and the merge makes the result independent of scheduling.

mod references;
mod strategies;

pub use references::{EACH, scan_resource_ids, storage_account_from_uri, strings_at};
pub use strategies::{Strategy, StrategyTable};

use crate::catalog::{NodeIndex, ResourceCatalog};
use crate::graph::{Relationship, RelationshipKind};
use crate::models::Resource;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A reference a strategy expected to resolve but could not
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedReference {
    pub source_id: String,
    pub reference: String,
    pub kind: RelationshipKind,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} reference from {} to {} could not be resolved",
            self.kind, self.source_id, self.reference
        )
    }
}

/// Candidate edges and misses collected while running strategies
#[derive(Debug, Default)]
pub struct Inference {
    edges: Vec<Relationship>,
    unresolved: Vec<UnresolvedReference>,
}

impl Inference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edge between two catalog resources; self references are ignored
    pub fn link(&mut self, source: &Resource, target: &Resource, kind: RelationshipKind) {
        if source.id == target.id {
            return;
        }
        tracing::debug!("{} -> {} ({})", source.id, target.id, kind);
        self.edges
            .push(Relationship::new(&source.id, &target.id, kind));
    }

    /// Record a reference that did not resolve
    pub fn missing(&mut self, source: &Resource, reference: &str, kind: RelationshipKind) {
        tracing::debug!(
            "Unresolved {} reference from {} to {}",
            kind,
            source.id,
            reference
        );
        self.unresolved.push(UnresolvedReference {
            source_id: source.id.clone(),
            reference: reference.to_string(),
            kind,
        });
    }

    /// Link to the resource with exactly this id
    pub fn resolve(
        &mut self,
        index: &NodeIndex<'_>,
        source: &Resource,
        reference: &str,
        kind: RelationshipKind,
    ) {
        match index.resolve(reference) {
            Some(target) => self.link(source, target, kind),
            None => self.missing(source, reference, kind),
        }
    }

    /// Link to the resource with this id or its nearest catalogued ancestor
    pub fn resolve_nearest(
        &mut self,
        index: &NodeIndex<'_>,
        source: &Resource,
        reference: &str,
        kind: RelationshipKind,
    ) {
        match index.resolve_nearest(reference) {
            Some(target) => self.link(source, target, kind),
            None => self.missing(source, reference, kind),
        }
    }

    /// Whether a strategy already gave up on this reference from this source
    pub fn was_missed(&self, source_id: &str, reference: &str) -> bool {
        self.unresolved
            .iter()
            .any(|miss| miss.source_id == source_id && miss.reference == reference)
    }

    pub fn edges(&self) -> &[Relationship] {
        &self.edges
    }

    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    fn absorb(&mut self, other: Inference) {
        self.edges.extend(other.edges);
        self.unresolved.extend(other.unresolved);
    }
}

/// Merged output of a resolution run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Sorted by (source, target, kind), no duplicates
    pub edges: Vec<Relationship>,
    /// Sorted, no duplicates
    pub unresolved: Vec<UnresolvedReference>,
}

/// Infers typed relationships between catalog resources
#[derive(Debug, Clone, Default)]
pub struct RelationshipResolver {
    table: StrategyTable,
}

impl RelationshipResolver {
    /// Resolver with the built-in strategy table
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with a custom strategy table
    pub fn with_table(table: StrategyTable) -> Self {
        Self { table }
    }

    /// Resolve all resource groups, in parallel when the `parallel` feature is on
    #[cfg(feature = "parallel")]
    pub fn resolve(&self, catalog: &ResourceCatalog) -> Resolution {
        let index = catalog.index();
        let groups = group_resources(&index);
        let partials: Vec<Inference> = groups
            .par_iter()
            .map(|(_, members)| self.resolve_group(&index, members))
            .collect();
        merge(partials)
    }

    /// Resolve all resource groups
    #[cfg(not(feature = "parallel"))]
    pub fn resolve(&self, catalog: &ResourceCatalog) -> Resolution {
        self.resolve_sequential(catalog)
    }

    /// Resolve one resource group after another on the calling thread
    pub fn resolve_sequential(&self, catalog: &ResourceCatalog) -> Resolution {
        let index = catalog.index();
        let partials: Vec<Inference> = group_resources(&index)
            .iter()
            .map(|(_, members)| self.resolve_group(&index, members))
            .collect();
        merge(partials)
    }

    fn resolve_group(&self, index: &NodeIndex<'_>, members: &[&Resource]) -> Inference {
        let mut inference = Inference::new();
        for &resource in members {
            for strategy in self.table.strategies_for(resource) {
                strategy(resource, index, &mut inference);
            }
        }
        inference
    }
}

/// Resources keyed by lowercase resource group, each group ordered by id
fn group_resources<'a>(index: &NodeIndex<'a>) -> Vec<(String, Vec<&'a Resource>)> {
    let mut groups: BTreeMap<String, Vec<&'a Resource>> = BTreeMap::new();
    for resource in index.resources() {
        groups
            .entry(resource.resource_group.to_ascii_lowercase())
            .or_default()
            .push(resource);
    }
    groups.into_iter().collect()
}

/// Combine per-group results into one ordered resolution
///
/// Scanned edges are dropped for pairs that a typed strategy already
/// connected in either direction.
fn merge(partials: Vec<Inference>) -> Resolution {
    let mut all = Inference::new();
    for partial in partials {
        all.absorb(partial);
    }

    let covered: BTreeSet<(&str, &str)> = all
        .edges
        .iter()
        .filter(|edge| !edge.kind.is_scanned())
        .map(|edge| unordered_pair(edge))
        .collect();

    let mut edges: Vec<Relationship> = all
        .edges
        .iter()
        .filter(|edge| !edge.kind.is_scanned() || !covered.contains(&unordered_pair(edge)))
        .cloned()
        .collect();
    edges.sort();
    edges.dedup();

    let mut unresolved = all.unresolved;
    unresolved.sort();
    unresolved.dedup();

    tracing::info!(
        "Resolved {} relationships ({} unresolved references)",
        edges.len(),
        unresolved.len()
    );
    Resolution { edges, unresolved }
}

fn unordered_pair(edge: &Relationship) -> (&str, &str) {
    let (a, b) = (edge.source_id.as_str(), edge.target_id.as_str());
    if a <= b { (a, b) } else { (b, a) }
}
