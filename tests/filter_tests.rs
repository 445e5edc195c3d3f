//! Filter engine tests
//!
//! Exclude patterns, resource-group includes, the compute-only projection and
//! the depth bound, plus idempotence of the whole filter.

use azgraph::config::FilterConfig;
use azgraph::filter::{FilterEngine, FilterError};
use azgraph::graph::{Relationship, RelationshipKind, Subgraph};
use azgraph::models::Resource;

fn node(id: &str, resource_type: &str, group: &str) -> Resource {
    Resource::new(id, id, resource_type, group)
}

fn edge(source: &str, target: &str, kind: RelationshipKind) -> Relationship {
    Relationship::new(source, target, kind)
}

/// vm1 -> nic1 -> subnet1 -> vnet1, vm1 -> disk1, plus an unconnected storage
/// account and a key vault in another group
fn sample() -> Subgraph {
    Subgraph::from_resources(
        vec![
            node("vm1", "Microsoft.Compute/virtualMachines", "rg-app"),
            node("disk1", "Microsoft.Compute/disks", "rg-app"),
            node("nic1", "Microsoft.Network/networkInterfaces", "rg-app"),
            node("subnet1", "Microsoft.Network/virtualNetworks/subnets", "rg-net"),
            node("vnet1", "Microsoft.Network/virtualNetworks", "rg-net"),
            node("storageAccount1", "Microsoft.Storage/storageAccounts", "rg-app"),
            node("kv1", "Microsoft.KeyVault/vaults", "rg-sec"),
        ],
        vec![
            edge("vm1", "disk1", RelationshipKind::AttachedDisk),
            edge("vm1", "nic1", RelationshipKind::NetworkMembership),
            edge("nic1", "subnet1", RelationshipKind::NetworkMembership),
            edge("subnet1", "vnet1", RelationshipKind::NetworkMembership),
            edge("kv1", "vnet1", RelationshipKind::CrossGroupReference),
        ],
    )
}

fn engine(config: FilterConfig) -> FilterEngine {
    FilterEngine::new(&config).unwrap()
}

fn ids(subgraph: &Subgraph) -> Vec<&str> {
    subgraph.nodes.keys().map(String::as_str).collect()
}

#[test]
fn test_subnet_exclusion_removes_node_and_edges() {
    let filtered = engine(FilterConfig {
        exclude_patterns: vec!["*.subnets".to_string()],
        ..Default::default()
    })
    .apply(sample());

    assert!(!filtered.nodes.contains_key("subnet1"));
    assert!(filtered.edges.iter().all(|e| !e.touches("subnet1")));
    assert_eq!(filtered.nodes.len(), 6);
    assert_eq!(filtered.edges.len(), 3);
}

#[test]
fn test_compute_only_keeps_transitive_network() {
    let subgraph = Subgraph::from_resources(
        vec![
            node("vm1", "Microsoft.Compute/virtualMachines", "rg"),
            node("nic1", "Microsoft.Network/networkInterfaces", "rg"),
            node("vnet1", "Microsoft.Network/virtualNetworks", "rg"),
            node("storageAccount1", "Microsoft.Storage/storageAccounts", "rg"),
        ],
        vec![
            edge("vm1", "nic1", RelationshipKind::NetworkMembership),
            edge("nic1", "vnet1", RelationshipKind::NetworkMembership),
        ],
    );
    let full = subgraph.nodes.len();

    let filtered = engine(FilterConfig {
        compute_only: true,
        ..Default::default()
    })
    .apply(subgraph);

    assert_eq!(ids(&filtered), vec!["nic1", "vm1", "vnet1"]);
    assert_eq!(filtered.edges.len(), 2);
    assert!(filtered.nodes.len() <= full);
}

#[test]
fn test_compute_only_drops_unrelated_kinds() {
    let filtered = engine(FilterConfig {
        compute_only: true,
        ..Default::default()
    })
    .apply(sample());

    assert_eq!(
        ids(&filtered),
        vec!["disk1", "nic1", "subnet1", "vm1", "vnet1"]
    );
}

#[test]
fn test_compute_only_without_core_is_empty() {
    let subgraph = Subgraph::from_resources(
        vec![
            node("vnet1", "Microsoft.Network/virtualNetworks", "rg"),
            node("sa1", "Microsoft.Storage/storageAccounts", "rg"),
        ],
        vec![edge("sa1", "vnet1", RelationshipKind::GenericReference)],
    );
    let filtered = engine(FilterConfig {
        compute_only: true,
        ..Default::default()
    })
    .apply(subgraph);
    assert!(filtered.nodes.is_empty());
    assert!(filtered.edges.is_empty());
}

#[test]
fn test_resource_group_include_is_case_insensitive() {
    let filtered = engine(FilterConfig {
        include_resource_groups: vec!["RG-NET".to_string()],
        ..Default::default()
    })
    .apply(sample());

    assert_eq!(ids(&filtered), vec!["subnet1", "vnet1"]);
    assert_eq!(filtered.edges.len(), 1);
}

#[test]
fn test_max_depth_from_compute_seeds() {
    let depth = |max_depth| {
        engine(FilterConfig {
            max_depth: Some(max_depth),
            ..Default::default()
        })
        .apply(sample())
    };

    assert_eq!(ids(&depth(0)), vec!["disk1", "vm1"]);
    assert_eq!(ids(&depth(1)), vec!["disk1", "nic1", "vm1"]);
    assert_eq!(
        ids(&depth(3)),
        vec!["disk1", "nic1", "subnet1", "vm1", "vnet1"]
    );
    assert_eq!(depth(4).nodes.len(), 6);
}

#[test]
fn test_max_depth_without_seeds_is_empty() {
    let subgraph = Subgraph::from_resources(
        vec![node("kv1", "Microsoft.KeyVault/vaults", "rg")],
        vec![],
    );
    let filtered = engine(FilterConfig {
        max_depth: Some(5),
        ..Default::default()
    })
    .apply(subgraph);
    assert!(filtered.nodes.is_empty());
}

#[test]
fn test_filter_is_idempotent() {
    let configs = vec![
        FilterConfig::default(),
        FilterConfig {
            exclude_patterns: vec!["*.subnets".to_string(), "Microsoft.Compute/disk?".to_string()],
            ..Default::default()
        },
        FilterConfig {
            compute_only: true,
            ..Default::default()
        },
        FilterConfig {
            compute_only: true,
            exclude_patterns: vec!["*.subnets".to_string()],
            max_depth: Some(1),
            ..Default::default()
        },
        FilterConfig {
            include_resource_groups: vec!["rg-app".to_string(), "rg-sec".to_string()],
            max_depth: Some(2),
            ..Default::default()
        },
    ];

    for config in configs {
        let engine = engine(config.clone());
        let once = engine.apply(sample());
        let twice = engine.apply(once.clone());
        assert_eq!(once, twice, "not idempotent for {:?}", config);
        assert!(
            once.edges
                .iter()
                .all(|e| once.nodes.contains_key(&e.source_id)
                    && once.nodes.contains_key(&e.target_id))
        );
    }
}

#[test]
fn test_excluded_subnet_breaks_compute_only_chain() {
    let filtered = engine(FilterConfig {
        compute_only: true,
        exclude_patterns: vec!["*.subnets".to_string()],
        ..Default::default()
    })
    .apply(sample());

    // vnet1 was only reachable through the subnet
    assert_eq!(ids(&filtered), vec!["disk1", "nic1", "vm1"]);
}

#[test]
fn test_configuration_errors() {
    let err = FilterEngine::new(&FilterConfig {
        exclude_patterns: vec!["Microsoft.Network//subnets".to_string()],
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, FilterError::InvalidPattern { .. }));
    assert!(err.to_string().contains("Microsoft.Network//subnets"));

    let err = FilterEngine::new(&FilterConfig {
        compute_only: true,
        exclude_patterns: vec!["*".to_string()],
        ..Default::default()
    })
    .unwrap_err();
    assert_eq!(
        err,
        FilterError::ComputeOnlyExcludesCore {
            patterns: vec!["*".to_string()]
        }
    );
}
