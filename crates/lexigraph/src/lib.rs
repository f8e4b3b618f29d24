//! Lexigraph: concept maps from hierarchical notes, umbrella crate.
//!
//! Re-exports every component and provides the request-scoped
//! [`MapService`] pipeline.

#![doc = include_str!("../README.md")]

pub mod service;
pub mod store;

pub use lexigraph_core as core;
pub use lexigraph_graph as graph;
pub use lexigraph_layout as layout;
pub use lexigraph_render as render;
pub use lexigraph_text as text;

pub use service::{MapService, MapSummary, RenderSettings, ServiceConfig};
pub use store::{MapStore, DEFAULT_STORE_CAPACITY};
