//! Reachability projections over a subgraph

use crate::graph::Subgraph;
use crate::models::ComputeTier;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Undirected adjacency over the subgraph's edges
fn neighbours(subgraph: &Subgraph) -> BTreeMap<&str, Vec<&str>> {
    let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for edge in &subgraph.edges {
        adjacency
            .entry(edge.source_id.as_str())
            .or_default()
            .push(edge.target_id.as_str());
        adjacency
            .entry(edge.target_id.as_str())
            .or_default()
            .push(edge.source_id.as_str());
    }
    adjacency
}

fn tier_of(subgraph: &Subgraph, id: &str) -> Option<ComputeTier> {
    subgraph
        .nodes
        .get(id)
        .and_then(|resource| resource.kind())
        .and_then(|kind| kind.compute_tier())
}

/// Ids of core compute nodes
pub fn core_nodes(subgraph: &Subgraph) -> Vec<&str> {
    subgraph
        .nodes
        .keys()
        .map(String::as_str)
        .filter(|id| tier_of(subgraph, id) == Some(ComputeTier::Core))
        .collect()
}

/// Core nodes plus the related nodes reachable from them through related nodes
pub fn compute_only(subgraph: &Subgraph) -> BTreeSet<String> {
    let adjacency = neighbours(subgraph);
    let mut kept: BTreeSet<&str> = BTreeSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for id in core_nodes(subgraph) {
        kept.insert(id);
        queue.push_back(id);
    }

    while let Some(current) = queue.pop_front() {
        for &next in adjacency.get(current).into_iter().flatten() {
            if kept.contains(next) || tier_of(subgraph, next).is_none() {
                continue;
            }
            kept.insert(next);
            queue.push_back(next);
        }
    }

    kept.into_iter().map(str::to_string).collect()
}

/// Nodes within `max_depth` undirected hops of any seed
pub fn within_depth(subgraph: &Subgraph, seeds: &[&str], max_depth: usize) -> BTreeSet<String> {
    let adjacency = neighbours(subgraph);
    let mut distance: BTreeMap<&str, usize> = BTreeMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for &seed in seeds {
        if subgraph.nodes.contains_key(seed) && distance.insert(seed, 0).is_none() {
            queue.push_back(seed);
        }
    }

    while let Some(current) = queue.pop_front() {
        let hops = distance[current];
        if hops == max_depth {
            continue;
        }
        for &next in adjacency.get(current).into_iter().flatten() {
            if !distance.contains_key(next) {
                distance.insert(next, hops + 1);
                queue.push_back(next);
            }
        }
    }

    distance.into_keys().map(str::to_string).collect()
}
