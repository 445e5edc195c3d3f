//! Graph data structures for resource relationships
//!
//! This module provides the typed edges inferred between resources, the
//! resource-group clusters, and the frozen [`Graph`] handed to layout and
//! rendering.

mod builder;

pub use builder::{GraphAssembler, GraphBuilder};

use crate::models::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Type of relationship between resources
///
/// Variant order is the tie-break order when edges are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    /// Virtual machine uses a managed disk
    AttachedDisk,
    /// NIC, subnet, virtual network, NSG, load balancer wiring
    NetworkMembership,
    /// Consumer authenticates with a managed identity or SSH key
    IdentityUsage,
    /// Private DNS zone linked to a virtual network
    DnsLink,
    /// Private endpoint or private link service bound to its target
    PrivateLink,
    /// Image version, image definition, gallery containment
    GalleryHierarchy,
    /// Boot diagnostics written to a storage account
    StorageDiagnostic,
    /// Unclassified reference into another resource group
    CrossGroupReference,
    /// Unclassified reference within the same resource group
    GenericReference,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::AttachedDisk => "attached-disk",
            RelationshipKind::NetworkMembership => "network-membership",
            RelationshipKind::IdentityUsage => "identity-usage",
            RelationshipKind::DnsLink => "dns-link",
            RelationshipKind::PrivateLink => "private-link",
            RelationshipKind::GalleryHierarchy => "gallery-hierarchy",
            RelationshipKind::StorageDiagnostic => "storage-diagnostic",
            RelationshipKind::CrossGroupReference => "cross-group-reference",
            RelationshipKind::GenericReference => "generic-reference",
        }
    }

    /// Kinds produced by the catch-all reference scan rather than a typed strategy
    pub fn is_scanned(&self) -> bool {
        matches!(
            self,
            RelationshipKind::CrossGroupReference | RelationshipKind::GenericReference
        )
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A directed edge: `source_id` depends on `target_id`
///
/// Ordering is (source, target, kind), which is also the merge order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub source_id: String,
    pub target_id: String,
    pub kind: RelationshipKind,
}

impl Relationship {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            kind,
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source_id == id || self.target_id == id
    }
}

/// Edge label shown by renderers, refined by endpoint types where the kind alone is vague
pub fn edge_label(kind: RelationshipKind, source: &Resource, target: &Resource) -> &'static str {
    use ResourceKind as K;
    match (kind, source.kind(), target.kind()) {
        (RelationshipKind::AttachedDisk, _, _) => "attached",
        (RelationshipKind::NetworkMembership, Some(K::VirtualMachine), _) => "uses",
        (RelationshipKind::NetworkMembership, Some(K::Subnet), Some(K::VirtualNetwork)) => {
            "part of"
        }
        (RelationshipKind::NetworkMembership, _, Some(K::NetworkSecurityGroup)) => "secured by",
        (RelationshipKind::NetworkMembership, _, Some(K::RouteTable)) => "uses routing",
        (RelationshipKind::NetworkMembership, _, Some(K::LoadBalancer)) => "behind",
        (RelationshipKind::NetworkMembership, _, Some(K::PublicIpAddress)) => "exposed via",
        (RelationshipKind::NetworkMembership, _, _) => "deployed in",
        (RelationshipKind::IdentityUsage, _, Some(K::SshPublicKey)) => "authenticates",
        (RelationshipKind::IdentityUsage, _, _) => "uses identity",
        (RelationshipKind::DnsLink, Some(K::PrivateDnsZoneLink), Some(K::PrivateDnsZone)) => {
            "links to"
        }
        (RelationshipKind::DnsLink, Some(K::PrivateDnsZoneLink), _) => "connects to",
        (RelationshipKind::DnsLink, _, _) => "provides DNS for",
        (RelationshipKind::PrivateLink, _, Some(K::LoadBalancer)) => "fronts",
        (RelationshipKind::PrivateLink, _, _) => "private link to",
        (RelationshipKind::GalleryHierarchy, Some(K::GalleryImageVersion), _) => "version of",
        (RelationshipKind::GalleryHierarchy, _, _) => "contained in",
        (RelationshipKind::StorageDiagnostic, _, _) => "stores diagnostics",
        (RelationshipKind::CrossGroupReference, _, _) => "references",
        (RelationshipKind::GenericReference, _, _) => "depends on",
    }
}

/// Nodes and edges between pipeline stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subgraph {
    pub nodes: BTreeMap<String, Resource>,
    pub edges: BTreeSet<Relationship>,
}

impl Subgraph {
    pub fn new(
        nodes: BTreeMap<String, Resource>,
        edges: impl IntoIterator<Item = Relationship>,
    ) -> Self {
        Self {
            nodes,
            edges: edges.into_iter().collect(),
        }
    }

    /// Convenience constructor from a list of resources
    pub fn from_resources(
        resources: impl IntoIterator<Item = Resource>,
        edges: impl IntoIterator<Item = Relationship>,
    ) -> Self {
        let nodes = resources
            .into_iter()
            .map(|resource| (resource.id.clone(), resource))
            .collect();
        Self::new(nodes, edges)
    }

    /// Drop edges whose endpoints are not both present
    pub fn prune_dangling_edges(&mut self) -> usize {
        let before = self.edges.len();
        let nodes = &self.nodes;
        self.edges
            .retain(|edge| nodes.contains_key(&edge.source_id) && nodes.contains_key(&edge.target_id));
        before - self.edges.len()
    }
}

/// A resource group and its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroupCluster {
    pub name: String,
    /// Member ids, ascending
    pub members: Vec<String>,
}

/// The assembled, immutable resource graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<String, Resource>,
    edges: BTreeSet<Relationship>,
    /// Keyed by lowercase group name
    clusters: BTreeMap<String, ResourceGroupCluster>,
}

impl Graph {
    pub(crate) fn from_parts(
        nodes: BTreeMap<String, Resource>,
        edges: BTreeSet<Relationship>,
        clusters: BTreeMap<String, ResourceGroupCluster>,
    ) -> Self {
        Self {
            nodes,
            edges,
            clusters,
        }
    }

    /// An explicit "nothing to draw" result
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Resource> {
        self.nodes.get(id)
    }

    /// Nodes ordered by id
    pub fn nodes(&self) -> impl Iterator<Item = &Resource> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edges ordered by (source, target, kind)
    pub fn edges(&self) -> impl Iterator<Item = &Relationship> {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, source: &str, target: &str, kind: RelationshipKind) -> bool {
        self.edges
            .contains(&Relationship::new(source, target, kind))
    }

    /// Clusters ordered by name
    pub fn clusters(&self) -> impl Iterator<Item = &ResourceGroupCluster> {
        self.clusters.values()
    }

    /// Case-insensitive cluster lookup
    pub fn cluster(&self, name: &str) -> Option<&ResourceGroupCluster> {
        self.clusters.get(&name.to_ascii_lowercase())
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Edges whose endpoints sit in different resource groups
    pub fn cross_group_edges(&self) -> impl Iterator<Item = &Relationship> {
        self.edges.iter().filter(|edge| {
            match (self.nodes.get(&edge.source_id), self.nodes.get(&edge.target_id)) {
                (Some(source), Some(target)) => !source
                    .resource_group
                    .eq_ignore_ascii_case(&target.resource_group),
                _ => false,
            }
        })
    }

    /// Back to the stage representation, e.g. to filter an assembled graph again
    pub fn to_subgraph(&self) -> Subgraph {
        Subgraph {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }
}
