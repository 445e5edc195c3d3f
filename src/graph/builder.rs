//! Graph assembly
//!
//! Accumulates nodes and edges into builder-local mutable state, then freezes
//! them into one immutable [`Graph`].

use super::{Graph, Relationship, ResourceGroupCluster, Subgraph};
use crate::models::{Resource, ResourceCategory};
use std::collections::{BTreeMap, BTreeSet};

/// Mutable accumulator for a [`Graph`]
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: BTreeMap<String, Resource>,
    edges: BTreeSet<Relationship>,
}

impl GraphBuilder {
    /// Create a new empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; a later node with the same id replaces the earlier one
    pub fn add_node(&mut self, resource: Resource) {
        self.nodes.insert(resource.id.clone(), resource);
    }

    /// Add an edge; identical (source, target, kind) triples collapse
    pub fn add_edge(&mut self, edge: Relationship) {
        self.edges.insert(edge);
    }

    /// Freeze into a graph
    pub fn build(self) -> Graph {
        let GraphBuilder { nodes, mut edges } = self;

        let before = edges.len();
        edges.retain(|edge| {
            edge.source_id != edge.target_id
                && nodes.contains_key(&edge.source_id)
                && nodes.contains_key(&edge.target_id)
        });
        if edges.len() < before {
            tracing::debug!("Dropped {} dangling or self edges", before - edges.len());
        }

        let redundant: Vec<Relationship> = edges
            .iter()
            .filter(|edge| {
                let reverse = Relationship::new(&edge.target_id, &edge.source_id, edge.kind);
                edges.contains(&reverse) && !preferred_direction(&nodes, edge)
            })
            .cloned()
            .collect();
        for edge in &redundant {
            tracing::debug!(
                "Collapsing reverse {} edge {} -> {}",
                edge.kind,
                edge.source_id,
                edge.target_id
            );
            edges.remove(edge);
        }

        let mut clusters: BTreeMap<String, ResourceGroupCluster> = BTreeMap::new();
        // Azure group names are case-insensitive; the first spelling seen names the cluster
        for resource in nodes.values() {
            clusters
                .entry(resource.resource_group.to_ascii_lowercase())
                .or_insert_with(|| ResourceGroupCluster {
                    name: resource.resource_group.clone(),
                    members: Vec::new(),
                })
                .members
                .push(resource.id.clone());
        }

        tracing::info!(
            "Assembled graph with {} nodes, {} edges, {} clusters",
            nodes.len(),
            edges.len(),
            clusters.len()
        );
        Graph::from_parts(nodes, edges, clusters)
    }
}

/// Of two opposite edges of the same kind, the one leaving the resource that
/// stacks first (compute before network before storage) survives
fn preferred_direction(nodes: &BTreeMap<String, Resource>, edge: &Relationship) -> bool {
    let key = |id: &str| -> (ResourceCategory, String) {
        let category = nodes
            .get(id)
            .map(Resource::category)
            .unwrap_or(ResourceCategory::Other);
        (category, id.to_string())
    };
    key(&edge.source_id) < key(&edge.target_id)
}

/// Turns filtered nodes and edges into the final graph
pub struct GraphAssembler;

impl GraphAssembler {
    pub fn assemble(subgraph: Subgraph) -> Graph {
        if subgraph.nodes.is_empty() {
            tracing::info!("Nothing survived filtering, producing an empty graph");
            return Graph::empty();
        }

        let mut builder = GraphBuilder::new();
        for resource in subgraph.nodes.into_values() {
            builder.add_node(resource);
        }
        for edge in subgraph.edges {
            builder.add_edge(edge);
        }
        builder.build()
    }
}
