//! Lexigraph Core: shared types, errors, and corpus utilities.
//!
//! This crate provides the foundational types used across all Lexigraph
//! crates. It has no internal Lexigraph dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`corpus`]: Content nodes, corpus indexing, scope selection, depth
//! - [`ids`]: Concept id derivation and deep links

pub mod corpus;
pub mod error;
pub mod ids;

// Re-export key types at crate root for convenience
pub use corpus::{ContentNode, Corpus, Scope};
pub use error::{Error, Result};
pub use ids::{concept_id, deep_link, CORE_ID};
