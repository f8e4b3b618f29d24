//! Structural checks for built concept maps.

use petgraph::algo::connected_components;
use std::collections::HashMap;

use crate::{pair_key, ConceptMap, Level, Relationship};

/// A broken structural invariant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Violation {
    /// There must be exactly one core node.
    #[error("expected exactly one core node, found {0}")]
    CoreCount(usize),

    /// A major must hang off the core by exactly one `contains` edge.
    #[error("major `{id}` has {count} core edges, expected 1")]
    MajorEdges { id: String, count: usize },

    /// A detail's `parent_major_id` is missing or does not name a major.
    #[error("detail `{0}` has no valid parent major")]
    OrphanDetail(String),

    /// A detail must hang off exactly one major by a `details` edge.
    #[error("detail `{id}` has {count} parent edges, expected 1")]
    DetailEdges { id: String, count: usize },

    /// Two semantic edges share an unordered concept pair.
    #[error("duplicate edges between `{0}` and `{1}`")]
    DuplicatePair(String, String),

    /// The map is not a single connected component.
    #[error("map has {0} connected components")]
    Disconnected(usize),
}

/// Checks a map against its structural invariants. An empty result means
/// the map is well formed.
pub fn validate_map(map: &ConceptMap) -> Vec<Violation> {
    let mut violations = Vec::new();

    let cores = map.nodes_at(Level::Core).count();
    if cores != 1 {
        violations.push(Violation::CoreCount(cores));
    }

    let mut incoming_hierarchy: HashMap<&str, usize> = HashMap::new();
    let mut pair_counts: HashMap<(String, String), usize> = HashMap::new();
    for edge in map.edges() {
        if edge.hierarchy {
            let valid = match edge.relationship {
                Relationship::Contains => map.get_node(&edge.from).is_some_and(|n| n.level == Level::Core),
                Relationship::Details => map.get_node(&edge.from).is_some_and(|n| n.level == Level::Major),
                _ => false,
            };
            if valid {
                *incoming_hierarchy.entry(edge.to.as_str()).or_default() += 1;
            }
        } else {
            *pair_counts.entry(pair_key(&edge.from, &edge.to)).or_default() += 1;
        }
    }

    for node in map.nodes() {
        let count = incoming_hierarchy.get(node.id.as_str()).copied().unwrap_or(0);
        match node.level {
            Level::Core => {}
            Level::Major => {
                if count != 1 {
                    violations.push(Violation::MajorEdges {
                        id: node.id.clone(),
                        count,
                    });
                }
            }
            Level::Detail => {
                let parent_ok = node
                    .parent_major_id
                    .as_deref()
                    .and_then(|p| map.get_node(p))
                    .is_some_and(|p| p.level == Level::Major);
                if !parent_ok {
                    violations.push(Violation::OrphanDetail(node.id.clone()));
                }
                if count != 1 {
                    violations.push(Violation::DetailEdges {
                        id: node.id.clone(),
                        count,
                    });
                }
            }
        }
    }

    let mut duplicates: Vec<(String, String)> = pair_counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(pair, _)| pair)
        .collect();
    duplicates.sort();
    violations.extend(duplicates.into_iter().map(|(a, b)| Violation::DuplicatePair(a, b)));

    if map.node_count() > 0 {
        let components = connected_components(&map.graph);
        if components != 1 {
            violations.push(Violation::Disconnected(components));
        }
    }

    if !violations.is_empty() {
        log::debug!("concept map has {} violations", violations.len());
    }
    violations
}
