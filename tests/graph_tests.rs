//! Graph assembly tests
//!
//! Tests for cluster partitioning, edge collapsing and the empty-graph result

use azgraph::catalog::ResourceCatalog;
use azgraph::config::CatalogConfig;
use azgraph::graph::{
    Graph, GraphAssembler, GraphBuilder, Relationship, RelationshipKind, Subgraph, edge_label,
};
use azgraph::models::{RawResource, Resource};
use azgraph::resolver::RelationshipResolver;
use serde_json::json;

fn node(id: &str, resource_type: &str, group: &str) -> Resource {
    Resource::new(id, id, resource_type, group)
}

fn edge(source: &str, target: &str, kind: RelationshipKind) -> Relationship {
    Relationship::new(source, target, kind)
}

fn assert_consistent(graph: &Graph) {
    for edge in graph.edges() {
        assert!(graph.node(&edge.source_id).is_some(), "dangling {}", edge.source_id);
        assert!(graph.node(&edge.target_id).is_some(), "dangling {}", edge.target_id);
        assert_ne!(edge.source_id, edge.target_id);
    }

    let mut members: Vec<&str> = graph
        .clusters()
        .flat_map(|cluster| cluster.members.iter().map(String::as_str))
        .collect();
    members.sort();
    let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(members, ids, "clusters must partition the nodes");
}

#[test]
fn test_empty_subgraph_gives_empty_graph() {
    let graph = GraphAssembler::assemble(Subgraph::default());
    assert!(graph.is_empty());
    assert_eq!(graph, Graph::empty());
    assert_eq!(graph.cluster_count(), 0);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_clusters_partition_nodes() {
    let graph = GraphAssembler::assemble(Subgraph::from_resources(
        vec![
            node("vm1", "Microsoft.Compute/virtualMachines", "rg-app"),
            node("disk1", "Microsoft.Compute/disks", "rg-app"),
            node("vnet1", "Microsoft.Network/virtualNetworks", "rg-net"),
            node("kv1", "Microsoft.KeyVault/vaults", "rg-sec"),
        ],
        vec![edge("vm1", "disk1", RelationshipKind::AttachedDisk)],
    ));

    assert_consistent(&graph);
    let names: Vec<&str> = graph.clusters().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["rg-app", "rg-net", "rg-sec"]);
    assert_eq!(
        graph.cluster("rg-app").unwrap().members,
        vec!["disk1".to_string(), "vm1".to_string()]
    );
}

#[test]
fn test_reverse_edge_collapse_and_dedup() {
    let graph = GraphAssembler::assemble(Subgraph::from_resources(
        vec![
            node("vm1", "Microsoft.Compute/virtualMachines", "rg"),
            node("nic1", "Microsoft.Network/networkInterfaces", "rg"),
            node("sa1", "Microsoft.Storage/storageAccounts", "rg"),
        ],
        vec![
            edge("nic1", "vm1", RelationshipKind::NetworkMembership),
            edge("vm1", "nic1", RelationshipKind::NetworkMembership),
            edge("vm1", "nic1", RelationshipKind::NetworkMembership),
            edge("sa1", "nic1", RelationshipKind::GenericReference),
            edge("nic1", "sa1", RelationshipKind::GenericReference),
        ],
    ));

    assert_consistent(&graph);
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.has_edge("vm1", "nic1", RelationshipKind::NetworkMembership));
    // network stacks above storage
    assert!(graph.has_edge("nic1", "sa1", RelationshipKind::GenericReference));
}

#[test]
fn test_builder_drops_dangling_edges() {
    let mut builder = GraphBuilder::new();
    builder.add_node(node("vm1", "Microsoft.Compute/virtualMachines", "rg"));
    builder.add_edge(edge("vm1", "gone", RelationshipKind::AttachedDisk));
    let graph = builder.build();

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert_consistent(&graph);
}

#[test]
fn test_cross_group_diagnostics_edge() {
    let sub = "/subscriptions/0000/resourceGroups";
    let vm = format!("{}/rg-a/providers/Microsoft.Compute/virtualMachines/vm1", sub);
    let account = format!("{}/rg-b/providers/Microsoft.Storage/storageAccounts/diag", sub);
    let records: Vec<RawResource> = serde_json::from_value(json!([
        {
            "id": vm,
            "type": "Microsoft.Compute/virtualMachines",
            "properties": {
                "diagnosticsProfile": {
                    "bootDiagnostics": {
                        "enabled": true,
                        "storageUri": "https://diag.blob.core.windows.net/"
                    }
                }
            }
        },
        {"id": account, "type": "Microsoft.Storage/storageAccounts"}
    ]))
    .unwrap();

    let catalog = ResourceCatalog::ingest(records, &CatalogConfig::default()).unwrap();
    let resolution = RelationshipResolver::default().resolve(&catalog);
    let graph = GraphAssembler::assemble(Subgraph::new(catalog.into_nodes(), resolution.edges));

    assert_consistent(&graph);
    assert_eq!(graph.cluster_count(), 2);
    assert!(graph.has_edge(&vm, &account, RelationshipKind::StorageDiagnostic));
    assert_eq!(graph.cross_group_edges().count(), 1);
}

#[test]
fn test_to_subgraph_round_trips_through_assembly() {
    let graph = GraphAssembler::assemble(Subgraph::from_resources(
        vec![
            node("vm1", "Microsoft.Compute/virtualMachines", "rg"),
            node("disk1", "Microsoft.Compute/disks", "rg"),
        ],
        vec![edge("vm1", "disk1", RelationshipKind::AttachedDisk)],
    ));
    let again = GraphAssembler::assemble(graph.to_subgraph());
    assert_eq!(graph, again);
}

#[test]
fn test_edge_labels_follow_endpoint_types() {
    let subnet = node("s", "Microsoft.Network/virtualNetworks/subnets", "rg");
    let vnet = node("v", "Microsoft.Network/virtualNetworks", "rg");
    let nic = node("n", "Microsoft.Network/networkInterfaces", "rg");
    let nsg = node("g", "Microsoft.Network/networkSecurityGroups", "rg");

    assert_eq!(
        edge_label(RelationshipKind::NetworkMembership, &subnet, &vnet),
        "part of"
    );
    assert_eq!(
        edge_label(RelationshipKind::NetworkMembership, &nic, &nsg),
        "secured by"
    );
    assert_eq!(
        edge_label(RelationshipKind::NetworkMembership, &nic, &subnet),
        "deployed in"
    );
}

#[test]
fn test_group_name_case_does_not_split_clusters() {
    let sub = "/subscriptions/0000/resourceGroups";
    let lower = format!("{}/rg-app/providers/Contoso.Widgets/gadgets/a", sub);
    let mixed = format!("{}/RG-App/providers/Contoso.Widgets/gadgets/b", sub);
    let records: Vec<RawResource> = serde_json::from_value(json!([
        {"id": lower, "type": "Contoso.Widgets/gadgets", "properties": {"peer": mixed}},
        {"id": mixed, "type": "Contoso.Widgets/gadgets"}
    ]))
    .unwrap();

    let catalog = ResourceCatalog::ingest(records, &CatalogConfig::default()).unwrap();
    let resolution = RelationshipResolver::default().resolve(&catalog);
    let graph = GraphAssembler::assemble(Subgraph::new(catalog.into_nodes(), resolution.edges));

    assert_consistent(&graph);
    assert_eq!(graph.cluster_count(), 1);
    // ids order "RG-App" before "rg-app", so that spelling names the cluster
    let cluster = graph.cluster("rg-app").unwrap();
    assert_eq!(cluster.name, "RG-App");
    assert_eq!(cluster.members.len(), 2);
    assert!(graph.cluster("RG-APP").is_some());

    assert!(graph.has_edge(&lower, &mixed, RelationshipKind::GenericReference));
    assert_eq!(graph.cross_group_edges().count(), 0);
}
