//! Phase 1 of clustering (spec §4.2): an entity co-occurrence graph, whose
//! connected components are the entity-based candidate clusters.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::connected_components;
use petgraph::graphmap::UnGraphMap;
use petgraph::unionfind::UnionFind;
use petgraph::visit::{IntoNodeIdentifiers, NodeIndexable};

/// `w(a, b) = |E_a ∩ E_b| / min(|E_a|, |E_b|)` restricted to entities that
/// appear in at least `min_entity_support` events, edges kept only at
/// `w >= edge_threshold` (spec §4.2).
pub fn build_cooccurrence_graph<'a>(
    entities_per_event: impl Iterator<Item = &'a BTreeSet<String>>,
    min_entity_support: usize,
    edge_threshold: f64,
) -> Vec<Vec<String>> {
    let mut event_sets: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
    for (idx, entities) in entities_per_event.enumerate() {
        for entity in entities {
            event_sets.entry(entity.clone()).or_default().insert(idx);
        }
    }

    let nodes: Vec<String> = event_sets
        .iter()
        .filter(|(_, events)| events.len() >= min_entity_support)
        .map(|(entity, _)| entity.clone())
        .collect();

    let mut graph: UnGraphMap<&str, f64> = UnGraphMap::new();
    for node in &nodes {
        graph.add_node(node.as_str());
    }

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let a = &event_sets[&nodes[i]];
            let b = &event_sets[&nodes[j]];
            let intersection = a.intersection(b).count();
            if intersection == 0 {
                continue;
            }
            let denom = a.len().min(b.len());
            let weight = intersection as f64 / denom as f64;
            if weight >= edge_threshold {
                graph.add_edge(nodes[i].as_str(), nodes[j].as_str(), weight);
            }
        }
    }

    group_by_component(&graph)
}

/// Group graph nodes by connected component, returned in a deterministic
/// order (components sorted by their lexicographically smallest member).
fn group_by_component(graph: &UnGraphMap<&str, f64>) -> Vec<Vec<String>> {
    let _ = connected_components(graph); // sanity check the graph is well-formed
    let mut vertex_sets = UnionFind::new(graph.node_bound());
    for (a, b, _) in graph.all_edges() {
        let ai = graph.to_index(a);
        let bi = graph.to_index(b);
        vertex_sets.union(ai, bi);
    }

    let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for node in graph.node_identifiers() {
        let idx = graph.to_index(node);
        let root = vertex_sets.find(idx);
        groups.entry(root).or_default().push(node.to_string());
    }

    let mut result: Vec<Vec<String>> = groups.into_values().collect();
    for group in &mut result {
        group.sort();
    }
    result.sort_by(|a, b| a[0].cmp(&b[0]));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(entities: &[&str]) -> BTreeSet<String> {
        entities.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn two_entities_cooccurring_above_threshold_form_one_component() {
        let events = vec![set(&["A", "B"]), set(&["A", "B"]), set(&["A", "B"])];
        let components = build_cooccurrence_graph(events.iter(), 1, 0.30);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0], vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn unrelated_entities_stay_in_separate_components() {
        let events = vec![set(&["A"]), set(&["A"]), set(&["B"]), set(&["B"])];
        let components = build_cooccurrence_graph(events.iter(), 2, 0.30);
        assert_eq!(components.len(), 2);
    }

    #[test]
    fn entity_below_min_support_is_dropped() {
        let events = vec![set(&["A"]), set(&["B"]), set(&["B"])];
        let components = build_cooccurrence_graph(events.iter(), 2, 0.30);
        assert_eq!(components, vec![vec!["B".to_string()]]);
    }

    #[test]
    fn weak_cooccurrence_below_threshold_does_not_link() {
        let events = vec![
            set(&["A", "B"]),
            set(&["A"]),
            set(&["A"]),
            set(&["A"]),
            set(&["B"]),
            set(&["B"]),
            set(&["B"]),
        ];
        let components = build_cooccurrence_graph(events.iter(), 2, 0.30);
        assert_eq!(components.len(), 2);
    }
}
