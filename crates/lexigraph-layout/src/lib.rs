//! Interactive layout for Lexigraph concept maps.
//!
//! - [`params`]: the tunable physics parameters and their ranges
//! - [`geometry`]: `Vec2` and the `Canvas` bounds
//! - [`simulation`]: the annealed force simulation
//! - [`scheduler`]: single-run frame scheduling
//! - [`session`]: expand/collapse, drag, pan, zoom and popup state
//!
//! The session is headless. A host (the HTML renderer's script, or a test)
//! calls [`LayoutSession::on_frame`] with the token from
//! [`LayoutSession::pending_frame`] once per animation frame.

pub mod geometry;
pub mod params;
pub mod scheduler;
pub mod session;
pub mod simulation;

pub use geometry::{Canvas, Vec2};
pub use params::{ParamKind, ParamRange, PhysicsParams, HIERARCHY_REST_RATIO};
pub use scheduler::{FrameScheduler, FrameToken};
pub use session::{
    DirtyLayers, LayoutSession, NodeDetail, NodeView, SessionOptions, Viewport, INFERRED_CONCEPT,
    MAX_ZOOM, MIN_ZOOM,
};
pub use simulation::{Body, Link, Simulation, CORE_RADIUS, DETAIL_RADIUS, JITTER, MAJOR_RADIUS};
