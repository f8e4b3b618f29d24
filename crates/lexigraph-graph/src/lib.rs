//! Concept graph construction for Lexigraph.
//!
//! This crate turns a concept vocabulary and a scoped corpus into a
//! classified, connected [`ConceptMap`]:
//!
//! - [`types`]: `ConceptNode`, `ConceptEdge`, `Relationship`, `ConceptMap`
//! - [`classifier`]: the `RelationClassifier` seam and the default
//!   phrase-pattern classifier
//! - [`builder`]: `ConceptGraphBuilder` and its request/outcome types
//! - [`validate`]: structural invariant checks
//!
//! # Example
//!
//! ```rust
//! use lexigraph_core::{ContentNode, Corpus};
//! use lexigraph_graph::{BuildOutcome, ConceptGraphBuilder, MapRequest};
//!
//! let corpus = Corpus::new(vec![
//!     ContentNode::new("a", "Cats cause allergies"),
//!     ContentNode::new("b", "Allergies cause sneezing"),
//! ]);
//! let request = MapRequest::explicit(["cats", "allergies", "sneezing"]);
//!
//! let BuildOutcome::Built(map) = ConceptGraphBuilder::new().build(&corpus, &request) else {
//!     panic!("expected a map");
//! };
//! assert_eq!(map.semantic_edges().count(), 2);
//! ```

pub mod builder;
pub mod classifier;
pub mod types;
pub mod validate;

pub use builder::{
    BuildOutcome, BuildStats, BuilderConfig, ConceptGraphBuilder, MapRequest, Rejection,
    RejectionReason, Vocabulary, VocabularyEntry, DEFAULT_TITLE, MIN_VOCABULARY,
};
pub use classifier::{Classification, PatternClassifier, RelationClassifier};
pub use types::{
    pair_key, ConceptEdge, ConceptMap, ConceptNode, Level, MapExport, RelationFamily,
    Relationship,
};
pub use validate::{validate_map, Violation};
