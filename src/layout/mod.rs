//! Layout hints and the renderer-facing view
//!
//! The annotator decides where things go without running any layout
//! algorithm: clusters are placed left to right by name, and nodes inside a
//! cluster are stacked top to bottom by category, then name, then id.
//! Renderers read everything they need from [`AnnotatedGraph`].

mod labels;

pub use labels::{LabelVerbosity, display_name, node_label, type_caption};

use crate::config::LayoutConfig;
use crate::graph::{Graph, RelationshipKind, edge_label};
use crate::models::{PowerState, Resource, ResourceCategory};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A node as a renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub category: ResourceCategory,
    pub resource_group: String,
    pub label: String,
    /// Vertical position inside the cluster, 0 at the top
    pub rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_state: Option<PowerState>,
    /// Scalar top-level properties worth printing
    #[serde(skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub properties: std::collections::BTreeMap<String, String>,
}

/// An edge as a renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub source_id: String,
    pub target_id: String,
    pub kind: RelationshipKind,
    pub label: String,
}

/// A resource group box and its stacked members
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterLayout {
    pub name: String,
    /// Horizontal position, 0 on the left
    pub position: usize,
    /// Member ids from top to bottom
    pub members: Vec<String>,
}

/// Graph plus layout hints and labels, ready for an external renderer
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedGraph {
    clusters: Vec<ClusterLayout>,
    nodes: Vec<RenderNode>,
    edges: Vec<RenderEdge>,
    #[serde(skip)]
    graph: Graph,
    #[serde(skip)]
    node_index: HashMap<String, usize>,
}

impl AnnotatedGraph {
    /// The underlying graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes ordered by cluster position, then rank
    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Edges ordered by (source, target, kind)
    pub fn edges(&self) -> &[RenderEdge] {
        &self.edges
    }

    /// Clusters ordered by position
    pub fn clusters(&self) -> &[ClusterLayout] {
        &self.clusters
    }

    pub fn rank(&self, id: &str) -> Option<usize> {
        self.node(id).map(|node| node.rank)
    }

    pub fn position(&self, cluster: &str) -> Option<usize> {
        self.clusters
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(cluster))
            .map(|c| c.position)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Text outline: clusters with their stacked members, then edges by name
impl fmt::Display for AnnotatedGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "(no resources)");
        }
        for cluster in &self.clusters {
            writeln!(f, "[{}] {}", cluster.position, cluster.name)?;
            for id in &cluster.members {
                let Some(node) = self.node(id) else {
                    continue;
                };
                write!(f, "  {}. {}", node.rank, node.label.replace('\n', " "))?;
                if let Some(state) = node.power_state {
                    write!(f, " <{}>", state)?;
                }
                writeln!(f)?;
            }
        }
        if !self.edges.is_empty() {
            writeln!(f, "edges:")?;
            for edge in &self.edges {
                let name = |id: &str| {
                    self.node(id)
                        .map(|node| node.name.clone())
                        .unwrap_or_else(|| id.to_string())
                };
                writeln!(
                    f,
                    "  {} -> {} [{}] {}",
                    name(&edge.source_id),
                    name(&edge.target_id),
                    edge.kind,
                    edge.label
                )?;
            }
        }
        Ok(())
    }
}

/// Attaches positions, ranks and labels to an assembled graph
#[derive(Debug, Clone)]
pub struct LayoutAnnotator {
    verbosity: LabelVerbosity,
    show_power_state: bool,
}

impl LayoutAnnotator {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            verbosity: config.label_verbosity,
            show_power_state: config.show_power_state,
        }
    }

    pub fn annotate(&self, graph: Graph) -> AnnotatedGraph {
        let mut clusters = Vec::with_capacity(graph.cluster_count());
        let mut nodes = Vec::with_capacity(graph.node_count());

        for (position, cluster) in graph.clusters().enumerate() {
            let mut members: Vec<&Resource> = cluster
                .members
                .iter()
                .filter_map(|id| graph.node(id))
                .collect();
            members.sort_by(|a, b| stacking_key(a).cmp(&stacking_key(b)));

            for (rank, resource) in members.iter().enumerate() {
                nodes.push(self.render_node(resource, rank));
            }
            clusters.push(ClusterLayout {
                name: cluster.name.clone(),
                position,
                members: members.iter().map(|r| r.id.clone()).collect(),
            });
        }

        let edges = graph
            .edges()
            .filter_map(|edge| {
                let source = graph.node(&edge.source_id)?;
                let target = graph.node(&edge.target_id)?;
                Some(RenderEdge {
                    source_id: edge.source_id.clone(),
                    target_id: edge.target_id.clone(),
                    kind: edge.kind,
                    label: edge_label(edge.kind, source, target).to_string(),
                })
            })
            .collect();

        let node_index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();

        tracing::debug!(
            "Annotated {} clusters with {} verbosity",
            clusters.len(),
            self.verbosity
        );
        AnnotatedGraph {
            clusters,
            nodes,
            edges,
            graph,
            node_index,
        }
    }

    fn render_node(&self, resource: &Resource, rank: usize) -> RenderNode {
        RenderNode {
            id: resource.id.clone(),
            name: resource.name.clone(),
            resource_type: resource.resource_type.clone(),
            category: resource.category(),
            resource_group: resource.resource_group.clone(),
            label: node_label(resource, self.verbosity),
            rank,
            power_state: if self.show_power_state {
                resource.power_state
            } else {
                None
            },
            properties: resource.label_properties(),
        }
    }
}

fn stacking_key(resource: &Resource) -> (ResourceCategory, &str, &str) {
    (resource.category(), resource.name.as_str(), resource.id.as_str())
}
