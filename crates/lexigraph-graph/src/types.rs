//! Concept map types.
//!
//! A [`ConceptMap`] is built once per request and handed to a renderer as an
//! immutable value. Renderers layer their own presentation state on top of
//! it; nothing here carries coordinates or visibility.

use lexigraph_core::CORE_ID;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::builder::BuildStats;

// ============================================================================
// Level
// ============================================================================

/// Hierarchy tier of a concept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// The single root of the map.
    Core,
    /// A primary theme, always visible.
    Major,
    /// A supporting theme nested under exactly one major.
    Detail,
}

impl Level {
    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Major => "major",
            Self::Detail => "detail",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Relationship enum
// ============================================================================

/// Broad category a relationship belongs to. Renderers style edges by family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationFamily {
    /// causes, enables, prevents
    Causal,
    /// includes, part_of, is_a, uses
    Structural,
    /// precedes, follows
    Temporal,
    /// requires, implies, supports
    Logical,
    /// contradicts
    Contradictory,
    /// contrasts_with, similar_to
    Comparative,
    /// Implicit core/major/detail edges.
    Hierarchy,
    /// related_to and free-form phrases.
    Default,
}

impl RelationFamily {
    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Causal => "causal",
            Self::Structural => "structural",
            Self::Temporal => "temporal",
            Self::Logical => "logical",
            Self::Contradictory => "contradictory",
            Self::Comparative => "comparative",
            Self::Hierarchy => "hierarchy",
            Self::Default => "default",
        }
    }
}

/// Relationship label carried by an edge.
///
/// The fixed vocabulary covers what the pattern classifier can detect;
/// anything else goes through `Custom`.
///
/// # Example
///
/// ```rust
/// use lexigraph_graph::{RelationFamily, Relationship};
///
/// assert_eq!(Relationship::Causes.family(), RelationFamily::Causal);
/// assert!(Relationship::SimilarTo.is_symmetric());
/// assert_eq!(Relationship::Custom("mirrors".into()).name(), "mirrors");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Causes,
    Enables,
    Prevents,
    Includes,
    PartOf,
    IsA,
    Uses,
    Precedes,
    Follows,
    Requires,
    Implies,
    Supports,
    Contradicts,
    ContrastsWith,
    SimilarTo,
    /// Core to major.
    Contains,
    /// Major to detail.
    Details,
    /// Co-occurring, cause unknown.
    #[default]
    RelatedTo,
    /// Free-form phrase.
    Custom(String),
}

impl Relationship {
    /// Returns the relationship name as a string.
    pub fn name(&self) -> &str {
        match self {
            Self::Causes => "causes",
            Self::Enables => "enables",
            Self::Prevents => "prevents",
            Self::Includes => "includes",
            Self::PartOf => "part_of",
            Self::IsA => "is_a",
            Self::Uses => "uses",
            Self::Precedes => "precedes",
            Self::Follows => "follows",
            Self::Requires => "requires",
            Self::Implies => "implies",
            Self::Supports => "supports",
            Self::Contradicts => "contradicts",
            Self::ContrastsWith => "contrasts_with",
            Self::SimilarTo => "similar_to",
            Self::Contains => "contains",
            Self::Details => "details",
            Self::RelatedTo => "related_to",
            Self::Custom(phrase) => phrase,
        }
    }

    /// Family used for styling.
    pub fn family(&self) -> RelationFamily {
        match self {
            Self::Causes | Self::Enables | Self::Prevents => RelationFamily::Causal,
            Self::Includes | Self::PartOf | Self::IsA | Self::Uses => RelationFamily::Structural,
            Self::Precedes | Self::Follows => RelationFamily::Temporal,
            Self::Requires | Self::Implies | Self::Supports => RelationFamily::Logical,
            Self::Contradicts => RelationFamily::Contradictory,
            Self::ContrastsWith | Self::SimilarTo => RelationFamily::Comparative,
            Self::Contains | Self::Details => RelationFamily::Hierarchy,
            Self::RelatedTo | Self::Custom(_) => RelationFamily::Default,
        }
    }

    /// Whether `a rel b` implies `b rel a`.
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            Self::RelatedTo | Self::SimilarTo | Self::ContrastsWith | Self::Contradicts
        )
    }

    /// Whether this is one of the implicit hierarchy labels.
    pub fn is_hierarchy(&self) -> bool {
        matches!(self, Self::Contains | Self::Details)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ConceptNode / ConceptEdge
// ============================================================================

/// A concept in the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptNode {
    /// Kebab-case id; `core` for the core node.
    pub id: String,
    /// Display text.
    pub label: String,
    /// Hierarchy tier.
    pub level: Level,
    /// Supplied importance, or the occurrence count.
    pub importance: f32,
    /// Number of corpus items containing the concept.
    pub occurrences: usize,
    /// Owning major (detail nodes only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_major_id: Option<String>,
    /// Mean structural depth of the hits.
    pub depth: f32,
    /// Corpus item this concept traces back to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl ConceptNode {
    /// Creates the core node.
    pub fn core(label: impl Into<String>, source_id: Option<String>) -> Self {
        Self {
            id: CORE_ID.to_string(),
            label: label.into(),
            level: Level::Core,
            importance: 0.0,
            occurrences: 0,
            parent_major_id: None,
            depth: 0.0,
            source_id,
        }
    }

    /// Whether this node is a detail.
    pub fn is_detail(&self) -> bool {
        self.level == Level::Detail
    }
}

/// An edge between two concepts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptEdge {
    /// Source concept id.
    pub from: String,
    /// Target concept id.
    pub to: String,
    /// Relationship label.
    pub relationship: Relationship,
    /// Co-occurrence strength normalized to the strongest pair (0-1).
    pub weight: f32,
    /// Raw co-occurrence count.
    pub count: usize,
    /// Text window that triggered the classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    /// True for symmetric relationships.
    pub bidirectional: bool,
    /// True for implicit core/major/detail edges.
    pub hierarchy: bool,
}

impl ConceptEdge {
    /// Creates an implicit hierarchy edge.
    pub fn hierarchy(from: impl Into<String>, to: impl Into<String>, relationship: Relationship) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relationship,
            weight: 1.0,
            count: 0,
            evidence: None,
            bidirectional: false,
            hierarchy: true,
        }
    }

    /// Creates a semantic edge; `bidirectional` follows the relationship.
    pub fn semantic(
        from: impl Into<String>,
        to: impl Into<String>,
        relationship: Relationship,
        count: usize,
        weight: f32,
    ) -> Self {
        let bidirectional = relationship.is_symmetric();
        Self {
            from: from.into(),
            to: to.into(),
            relationship,
            weight,
            count,
            evidence: None,
            bidirectional,
            hierarchy: false,
        }
    }

    /// Sets the evidence text.
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    /// Order-independent pair key.
    pub fn pair_key(&self) -> (String, String) {
        pair_key(&self.from, &self.to)
    }
}

/// Sorts two ids into an order-independent key.
pub fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

// ============================================================================
// ConceptMap
// ============================================================================

/// A classified, connected concept graph.
///
/// Wraps a petgraph `DiGraph` with an id lookup table. Node and edge order
/// is insertion order: core, majors, details; hierarchy edges, then
/// semantic edges.
#[derive(Clone, Debug)]
pub struct ConceptMap {
    /// Title shown on the core node and in rendered output.
    pub title: String,
    /// The underlying directed graph.
    pub graph: DiGraph<ConceptNode, ConceptEdge>,
    /// Lookup table: concept id to node index.
    pub node_indices: HashMap<String, NodeIndex>,
    /// Whether a scan cap was hit.
    pub truncated: bool,
    /// Build statistics.
    pub stats: BuildStats,
}

impl ConceptMap {
    /// Creates an empty map.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            truncated: false,
            stats: BuildStats::default(),
        }
    }

    /// Adds a node, returning the existing index if the id is taken.
    pub fn add_node(&mut self, node: ConceptNode) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&node.id) {
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(id, idx);
        idx
    }

    /// Adds an edge between existing nodes.
    pub fn add_edge(&mut self, edge: ConceptEdge) -> lexigraph_core::Result<()> {
        let from = self
            .get_index(&edge.from)
            .ok_or_else(|| lexigraph_core::Error::not_found("concept", &edge.from))?;
        let to = self
            .get_index(&edge.to)
            .ok_or_else(|| lexigraph_core::Error::not_found("concept", &edge.to))?;
        self.graph.add_edge(from, to, edge);
        Ok(())
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Gets the petgraph index for an id.
    pub fn get_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    /// Gets a node by id.
    pub fn get_node(&self, id: &str) -> Option<&ConceptNode> {
        self.get_index(id).map(|idx| &self.graph[idx])
    }

    /// The core node, if present.
    pub fn core(&self) -> Option<&ConceptNode> {
        self.get_node(CORE_ID)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ConceptNode> {
        self.graph.node_weights()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &ConceptEdge> {
        self.graph.edge_weights()
    }

    /// Nodes at a given level.
    pub fn nodes_at(&self, level: Level) -> impl Iterator<Item = &ConceptNode> {
        self.nodes().filter(move |n| n.level == level)
    }

    /// Detail nodes owned by a major.
    pub fn details_of<'a>(&'a self, major_id: &'a str) -> impl Iterator<Item = &'a ConceptNode> {
        self.nodes()
            .filter(move |n| n.parent_major_id.as_deref() == Some(major_id))
    }

    /// Inferred (non-hierarchy) edges.
    pub fn semantic_edges(&self) -> impl Iterator<Item = &ConceptEdge> {
        self.edges().filter(|e| !e.hierarchy)
    }

    /// Flat, serializable view of the map.
    pub fn export(&self) -> MapExport {
        MapExport {
            title: self.title.clone(),
            truncated: self.truncated,
            nodes: self.nodes().cloned().collect(),
            edges: self.edges().cloned().collect(),
        }
    }
}

/// Serializable snapshot of a [`ConceptMap`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapExport {
    /// Map title.
    pub title: String,
    /// Whether a scan cap was hit.
    pub truncated: bool,
    /// Nodes in insertion order.
    pub nodes: Vec<ConceptNode>,
    /// Edges in insertion order.
    pub edges: Vec<ConceptEdge>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Relationship tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_relationship_families() {
        assert_eq!(Relationship::Prevents.family(), RelationFamily::Causal);
        assert_eq!(Relationship::Uses.family(), RelationFamily::Structural);
        assert_eq!(Relationship::Follows.family(), RelationFamily::Temporal);
        assert_eq!(Relationship::Supports.family(), RelationFamily::Logical);
        assert_eq!(Relationship::Contradicts.family(), RelationFamily::Contradictory);
        assert_eq!(Relationship::ContrastsWith.family(), RelationFamily::Comparative);
        assert_eq!(Relationship::Details.family(), RelationFamily::Hierarchy);
        assert_eq!(
            Relationship::Custom("x".into()).family(),
            RelationFamily::Default
        );
    }

    #[test]
    fn test_relationship_symmetry() {
        assert!(Relationship::RelatedTo.is_symmetric());
        assert!(Relationship::Contradicts.is_symmetric());
        assert!(!Relationship::Causes.is_symmetric());
        assert!(!Relationship::Precedes.is_symmetric());
    }

    #[test]
    fn test_relationship_serde_snake_case() {
        let json = serde_json::to_string(&Relationship::ContrastsWith).unwrap();
        assert_eq!(json, "\"contrasts_with\"");
        assert_eq!(Relationship::PartOf.to_string(), "part_of");
    }

    // ------------------------------------------------------------------------
    // ConceptMap tests
    // ------------------------------------------------------------------------

    fn major(id: &str) -> ConceptNode {
        ConceptNode {
            id: id.to_string(),
            label: id.to_string(),
            level: Level::Major,
            importance: 1.0,
            occurrences: 1,
            parent_major_id: None,
            depth: 0.0,
            source_id: None,
        }
    }

    #[test]
    fn test_add_node_is_idempotent_by_id() {
        let mut map = ConceptMap::new("t");
        let a = map.add_node(major("a"));
        let again = map.add_node(major("a"));
        assert_eq!(a, again);
        assert_eq!(map.node_count(), 1);
    }

    #[test]
    fn test_add_edge_missing_node() {
        let mut map = ConceptMap::new("t");
        map.add_node(ConceptNode::core("t", None));
        let err = map
            .add_edge(ConceptEdge::hierarchy(CORE_ID, "ghost", Relationship::Contains))
            .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_export_preserves_order() {
        let mut map = ConceptMap::new("t");
        map.add_node(ConceptNode::core("t", None));
        map.add_node(major("b"));
        map.add_node(major("a"));
        map.add_edge(ConceptEdge::hierarchy(CORE_ID, "b", Relationship::Contains))
            .unwrap();
        let export = map.export();
        let ids: Vec<&str> = export.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["core", "b", "a"]);
        assert_eq!(export.edges.len(), 1);
        assert!(map.core().is_some());
    }

    #[test]
    fn test_pair_key_order_independent() {
        assert_eq!(pair_key("x", "a"), pair_key("a", "x"));
        let edge = ConceptEdge::semantic("z", "m", Relationship::RelatedTo, 2, 1.0);
        assert_eq!(edge.pair_key(), ("m".to_string(), "z".to_string()));
        assert!(edge.bidirectional);
    }
}
