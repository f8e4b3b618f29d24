//! Interactive presentation state over an immutable concept map.
//!
//! A [`LayoutSession`] layers expand/collapse flags, a viewport, drag and
//! popup state on top of the map, and drives the [`Simulation`] through the
//! [`FrameScheduler`]. Nothing here mutates the map itself.

use lexigraph_core::{deep_link, Error, Result};
use lexigraph_graph::{ConceptEdge, ConceptMap, ConceptNode, Level, MapExport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::geometry::{Canvas, Vec2};
use crate::params::{ParamKind, PhysicsParams};
use crate::scheduler::{FrameScheduler, FrameToken};
use crate::simulation::{Link, Simulation};

/// Smallest zoom factor.
pub const MIN_ZOOM: f32 = 0.2;
/// Largest zoom factor.
pub const MAX_ZOOM: f32 = 5.0;

/// Popup text for concepts without a source item.
pub const INFERRED_CONCEPT: &str = "inferred concept, no direct source";

/// Session configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Physics parameters.
    #[serde(default)]
    pub physics: PhysicsParams,
    /// Drawing surface.
    #[serde(default)]
    pub canvas: Canvas,
    /// Host for deep links (`<host>/#/<itemId>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Jitter seed; entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Screen transform: `screen = world * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    /// Screen point to canvas coordinates.
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.pan) / self.zoom
    }

    /// Canvas point to screen coordinates.
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world * self.zoom + self.pan
    }
}

/// Which drawing layers need work before the next paint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyLayers {
    /// Edge elements must be rebuilt (visible edge set changed).
    pub connectors: bool,
    /// Node elements must be rebuilt (visible node set changed).
    pub shapes: bool,
    /// Positions moved; update coordinates only.
    pub geometry: bool,
}

/// Contents of the per-node popup.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeDetail {
    pub id: String,
    pub label: String,
    pub level: Level,
    /// Deep link to the source item, if the concept has one and a host is
    /// configured.
    pub link: Option<String>,
    /// Shown instead of a link for inferred concepts.
    pub note: Option<&'static str>,
}

/// Drawable state of one visible node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub label: String,
    pub level: Level,
    pub position: Vec2,
    pub radius: f32,
    /// Expand state for majors with details; `None` otherwise.
    pub expanded: Option<bool>,
}

/// Presentation state machine for one rendered map.
#[derive(Debug)]
pub struct LayoutSession {
    nodes: Vec<ConceptNode>,
    edges: Vec<ConceptEdge>,
    sim: Simulation,
    expanded: HashSet<String>,
    visible: Vec<bool>,
    visible_nodes: Vec<usize>,
    visible_edges: Vec<usize>,
    links: Vec<Link>,
    viewport: Viewport,
    dragging: Option<usize>,
    pan_anchor: Option<Vec2>,
    popup: Option<NodeDetail>,
    dirty: DirtyLayers,
    scheduler: FrameScheduler,
    host: Option<String>,
}

impl LayoutSession {
    /// Creates a session from a built map and starts the initial settle.
    pub fn from_map(map: &ConceptMap, options: SessionOptions) -> Result<Self> {
        Self::new(map.export(), options)
    }

    /// Creates a session from exported map data and starts the initial
    /// settle. Edges whose endpoints are missing are ignored.
    pub fn new(export: MapExport, options: SessionOptions) -> Result<Self> {
        options.canvas.validate()?;
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sim = Simulation::new(&export.nodes, options.physics, options.canvas, rng);

        let mut session = Self {
            visible: vec![false; export.nodes.len()],
            nodes: export.nodes,
            edges: export.edges,
            sim,
            expanded: HashSet::new(),
            visible_nodes: Vec::new(),
            visible_edges: Vec::new(),
            links: Vec::new(),
            viewport: Viewport::default(),
            dragging: None,
            pan_anchor: None,
            popup: None,
            dirty: DirtyLayers::default(),
            scheduler: FrameScheduler::new(),
            host: options.host,
        };
        session.recompute_visible();
        let iterations = session.sim.params().iterations;
        session.start_burst(iterations);
        Ok(session)
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    fn recompute_visible(&mut self) {
        let majors: HashSet<&str> = self
            .nodes
            .iter()
            .filter(|n| n.level == Level::Major)
            .map(|n| n.id.as_str())
            .collect();

        for (i, node) in self.nodes.iter().enumerate() {
            self.visible[i] = match node.level {
                Level::Core | Level::Major => true,
                Level::Detail => node
                    .parent_major_id
                    .as_deref()
                    .is_some_and(|p| majors.contains(p) && self.expanded.contains(p)),
            };
        }
        self.visible_nodes = (0..self.nodes.len()).filter(|&i| self.visible[i]).collect();

        self.visible_edges.clear();
        self.links.clear();
        for (k, edge) in self.edges.iter().enumerate() {
            let (Some(a), Some(b)) = (self.sim.index_of(&edge.from), self.sim.index_of(&edge.to)) else {
                continue;
            };
            if self.visible[a] && self.visible[b] {
                self.visible_edges.push(k);
                self.links.push(Link {
                    a,
                    b,
                    hierarchy: edge.hierarchy,
                });
            }
        }

        self.dirty.connectors = true;
        self.dirty.shapes = true;
    }

    /// Whether a concept is currently visible.
    pub fn is_visible(&self, id: &str) -> bool {
        self.sim
            .index_of(id)
            .is_some_and(|i| self.visible.get(i).copied().unwrap_or(false))
    }

    /// Ids of the visible concepts, in map order.
    pub fn visible_node_ids(&self) -> Vec<&str> {
        self.visible_nodes
            .iter()
            .map(|&i| self.nodes[i].id.as_str())
            .collect()
    }

    /// Visible edges, in map order.
    pub fn visible_edges(&self) -> Vec<&ConceptEdge> {
        self.visible_edges.iter().map(|&k| &self.edges[k]).collect()
    }

    /// Whether a major is expanded.
    pub fn is_expanded(&self, major_id: &str) -> bool {
        self.expanded.contains(major_id)
    }

    /// Number of details owned by a major.
    pub fn detail_count(&self, major_id: &str) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.parent_major_id.as_deref() == Some(major_id))
            .count()
    }

    /// Flips a major's expanded flag, reseeds revealed details near it and
    /// starts a burst. A drag on a detail hidden by the collapse is dropped.
    /// Returns the new state.
    pub fn toggle_expanded(&mut self, major_id: &str) -> Result<bool> {
        let is_major = self
            .nodes
            .iter()
            .any(|n| n.id == major_id && n.level == Level::Major);
        if !is_major {
            return Err(Error::not_found("major concept", major_id));
        }

        let expanded = if self.expanded.remove(major_id) {
            false
        } else {
            self.expanded.insert(major_id.to_string());
            true
        };

        if expanded && let Some(anchor) = self.sim.index_of(major_id) {
            let revealed: Vec<usize> = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.parent_major_id.as_deref() == Some(major_id))
                .map(|(i, _)| i)
                .collect();
            for i in revealed {
                self.sim.seed_near(i, anchor);
            }
        }

        log::debug!("{major_id} {}", if expanded { "expanded" } else { "collapsed" });
        self.recompute_visible();
        if let Some(idx) = self.dragging
            && !self.visible[idx]
        {
            self.sim.release(idx);
            self.dragging = None;
        }
        self.start_burst(self.sim.params().burst_iterations);
        Ok(expanded)
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    fn start_burst(&mut self, iterations: usize) {
        self.sim.reheat();
        self.scheduler.start(iterations);
    }

    /// Frame the host should call back with next, if a run is active.
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.scheduler.pending()
    }

    /// Host next-frame callback. Advances one step if `token` is current.
    pub fn on_frame(&mut self, token: FrameToken) -> bool {
        if !self.scheduler.accept(token) {
            return false;
        }
        self.sim.step(&self.visible_nodes, &self.links);
        self.dirty.geometry = true;
        true
    }

    /// Drives the active run to completion. Returns the frames advanced.
    pub fn settle(&mut self) -> usize {
        let mut frames = 0;
        while let Some(token) = self.pending_frame() {
            if self.on_frame(token) {
                frames += 1;
            }
        }
        frames
    }

    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    // ========================================================================
    // Pointer interaction
    // ========================================================================

    /// Starts dragging a visible, non-core node under the pointer.
    pub fn begin_drag(&mut self, id: &str, pointer: Vec2) -> bool {
        let Some(idx) = self.sim.index_of(id) else {
            return false;
        };
        if !self.visible[idx] {
            return false;
        }
        let world = self.viewport.to_world(pointer);
        if !self.sim.pin(idx, world) {
            return false;
        }
        self.dragging = Some(idx);
        self.dirty.geometry = true;
        true
    }

    /// Moves the dragged node to the pointer.
    pub fn drag_to(&mut self, pointer: Vec2) {
        if let Some(idx) = self.dragging {
            let world = self.viewport.to_world(pointer);
            self.sim.pin(idx, world);
            self.dirty.geometry = true;
        }
    }

    /// Releases the dragged node into a re-settle burst.
    pub fn end_drag(&mut self) {
        if let Some(idx) = self.dragging.take() {
            self.sim.release(idx);
            self.start_burst(self.sim.params().burst_iterations);
        }
    }

    /// Id of the node being dragged.
    pub fn dragging(&self) -> Option<&str> {
        self.dragging.map(|i| self.nodes[i].id.as_str())
    }

    /// Starts panning from a background pointer position.
    pub fn begin_pan(&mut self, pointer: Vec2) {
        self.pan_anchor = Some(pointer);
    }

    /// Pans by the pointer movement since the last call.
    pub fn pan_to(&mut self, pointer: Vec2) {
        if let Some(last) = self.pan_anchor.replace(pointer) {
            self.viewport.pan += pointer - last;
            self.dirty.geometry = true;
        }
    }

    /// Ends a pan.
    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    /// Multiplies the zoom by `factor`, keeping the point under `anchor`
    /// fixed. Returns the zoom applied.
    pub fn zoom_at(&mut self, factor: f32, anchor: Vec2) -> f32 {
        if !(factor.is_finite() && factor > 0.0) {
            return self.viewport.zoom;
        }
        let world = self.viewport.to_world(anchor);
        let zoom = (self.viewport.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.viewport.zoom = zoom;
        self.viewport.pan = anchor - world * zoom;
        self.dirty.geometry = true;
        zoom
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// Applies a parameter change and starts a fresh burst on the visible
    /// set. Returns the value applied after range clamping.
    pub fn set_param(&mut self, kind: ParamKind, value: f32) -> f32 {
        let mut params = self.sim.params().clone();
        let applied = params.set(kind, value);
        self.sim.set_params(params);
        self.start_burst(self.sim.params().burst_iterations);
        applied
    }

    /// Current physics parameters.
    pub fn params(&self) -> &PhysicsParams {
        self.sim.params()
    }

    // ========================================================================
    // Popup
    // ========================================================================

    /// Opens the popup for a visible node.
    pub fn select(&mut self, id: &str) -> Result<&NodeDetail> {
        let node = self
            .nodes
            .iter()
            .find(|n| n.id == id)
            .filter(|n| self.is_visible(&n.id))
            .ok_or_else(|| Error::not_found("visible concept", id))?;

        let detail = NodeDetail {
            id: node.id.clone(),
            label: node.label.clone(),
            level: node.level,
            link: node
                .source_id
                .as_deref()
                .and_then(|item| deep_link(self.host.as_deref(), item)),
            note: node.source_id.is_none().then_some(INFERRED_CONCEPT),
        };
        Ok(self.popup.insert(detail))
    }

    /// The open popup.
    pub fn popup(&self) -> Option<&NodeDetail> {
        self.popup.as_ref()
    }

    /// A click that hit no node dismisses the popup.
    pub fn click_background(&mut self) {
        self.popup = None;
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Returns and clears the dirty flags.
    pub fn take_dirty(&mut self) -> DirtyLayers {
        std::mem::take(&mut self.dirty)
    }

    /// Drawable state of the visible nodes.
    pub fn snapshot(&self) -> Vec<NodeView> {
        self.visible_nodes
            .iter()
            .filter_map(|&i| {
                let node = &self.nodes[i];
                let body = self.sim.body(i)?;
                let expanded = (node.level == Level::Major && self.detail_count(&node.id) > 0)
                    .then(|| self.is_expanded(&node.id));
                Some(NodeView {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    level: node.level,
                    position: body.position,
                    radius: body.radius,
                    expanded,
                })
            })
            .collect()
    }

    /// The underlying simulation.
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// The canvas.
    pub fn canvas(&self) -> &Canvas {
        self.sim.canvas()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexigraph_core::{ContentNode, Corpus, Scope, CORE_ID};
    use lexigraph_graph::{ConceptGraphBuilder, MapRequest, Relationship};

    fn biology_map() -> ConceptMap {
        let corpus = Corpus::new(vec![
            ContentNode::new("r", "Biology")
                .with_note("the study of cells, genetics, ecology and evolution"),
            ContentNode::new("c", "Cells").with_parent("r"),
            ContentNode::new("g", "Genetics").with_parent("r").with_note("inheritance of traits"),
            ContentNode::new("e", "Ecology").with_parent("r").with_note("organisms and habitats"),
            ContentNode::new("v", "Evolution").with_parent("r").with_note("natural selection"),
            ContentNode::new("m", "Mitochondria").with_parent("c").with_note("powerhouse inside cells"),
            ContentNode::new("rb", "Ribosomes").with_parent("c").with_note("protein factories inside cells"),
            ContentNode::new("n", "Nucleus").with_parent("c").with_note("stores dna for cells"),
        ]);
        let request = MapRequest::explicit([
            "cells",
            "genetics",
            "ecology",
            "evolution",
            "mitochondria",
            "ribosomes",
            "nucleus",
        ])
        .with_root("r")
        .with_scope(Scope::Children);
        ConceptGraphBuilder::new()
            .build(&corpus, &request)
            .into_result()
            .unwrap()
    }

    fn options() -> SessionOptions {
        SessionOptions {
            host: Some("https://notes.example".to_string()),
            seed: Some(11),
            ..Default::default()
        }
    }

    fn session() -> LayoutSession {
        LayoutSession::from_map(&biology_map(), options()).unwrap()
    }

    fn edge_set(s: &LayoutSession) -> HashSet<(String, String)> {
        s.visible_edges()
            .iter()
            .map(|e| (e.from.clone(), e.to.clone()))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Expand / collapse
    // ------------------------------------------------------------------------

    #[test]
    fn test_details_hidden_initially() {
        let s = session();
        assert_eq!(
            s.visible_node_ids(),
            vec![CORE_ID, "genetics", "ecology", "evolution", "cells"]
        );
        assert!(!s.is_expanded("cells"));
    }

    #[test]
    fn test_expand_reveals_exactly_three_details_and_collapse_hides_them() {
        let mut s = session();
        let nodes_before: HashSet<String> =
            s.visible_node_ids().into_iter().map(String::from).collect();
        let edges_before = edge_set(&s);

        assert!(s.toggle_expanded("cells").unwrap());
        let nodes_open: HashSet<String> =
            s.visible_node_ids().into_iter().map(String::from).collect();
        let revealed: HashSet<&str> = nodes_open
            .difference(&nodes_before)
            .map(String::as_str)
            .collect();
        assert_eq!(revealed, HashSet::from(["mitochondria", "ribosomes", "nucleus"]));
        assert!(nodes_before.is_subset(&nodes_open));

        let new_edges: HashSet<(String, String)> =
            edge_set(&s).difference(&edges_before).cloned().collect();
        assert!(!new_edges.is_empty());
        for (from, to) in &new_edges {
            assert!(revealed.contains(from.as_str()) || revealed.contains(to.as_str()));
        }
        assert!(new_edges.contains(&("cells".to_string(), "nucleus".to_string())));

        assert!(!s.toggle_expanded("cells").unwrap());
        let nodes_closed: HashSet<String> =
            s.visible_node_ids().into_iter().map(String::from).collect();
        assert_eq!(nodes_closed, nodes_before);
        assert_eq!(edge_set(&s), edges_before);
    }

    #[test]
    fn test_revealed_details_seeded_near_parent() {
        let mut s = session();
        s.settle();
        s.toggle_expanded("cells").unwrap();
        let parent = s.simulation().position("cells").unwrap();
        for id in ["mitochondria", "ribosomes", "nucleus"] {
            let p = s.simulation().position(id).unwrap();
            assert!((p - parent).length() <= crate::simulation::JITTER * 1.5);
        }
    }

    #[test]
    fn test_toggle_rejects_non_major() {
        let mut s = session();
        assert!(s.toggle_expanded("nucleus").is_err());
        assert!(s.toggle_expanded(CORE_ID).is_err());
        assert!(s.toggle_expanded("ghost").is_err());
    }

    #[test]
    fn test_dangling_edges_dropped() {
        let mut export = biology_map().export();
        export.edges.push(ConceptEdge::semantic(
            "cells",
            "ghost",
            Relationship::Causes,
            1,
            1.0,
        ));
        let s = LayoutSession::new(export, options()).unwrap();
        assert!(s.visible_edges().iter().all(|e| e.to != "ghost"));
    }

    #[test]
    fn test_visibility_change_marks_layers_dirty() {
        let mut s = session();
        s.take_dirty();
        s.toggle_expanded("cells").unwrap();
        let dirty = s.take_dirty();
        assert!(dirty.connectors && dirty.shapes);
        assert_eq!(s.take_dirty(), DirtyLayers::default());
    }

    // ------------------------------------------------------------------------
    // Scheduling and parameters
    // ------------------------------------------------------------------------

    #[test]
    fn test_initial_run_settles() {
        let mut s = session();
        assert!(s.is_running());
        let frames = s.settle();
        assert_eq!(frames, PhysicsParams::default().iterations);
        assert!(!s.is_running());
        for view in s.snapshot() {
            assert!(s.canvas().contains(view.position));
        }
    }

    #[test]
    fn test_set_param_restarts_run_and_reports_clamped_value() {
        let mut s = session();
        let stale = s.pending_frame().unwrap();
        let applied = s.set_param(ParamKind::Gravity, 10.0);
        assert_eq!(applied, ParamKind::Gravity.range().max);
        assert_eq!(s.params().gravity, applied);
        assert!(!s.on_frame(stale));
        assert!(s.on_frame(s.pending_frame().unwrap()));
    }

    // ------------------------------------------------------------------------
    // Pointer
    // ------------------------------------------------------------------------

    #[test]
    fn test_drag_pins_then_releases() {
        let mut s = session();
        s.settle();
        let target = Vec2::new(200.0, 150.0);
        assert!(s.begin_drag("genetics", target));
        s.drag_to(target);
        assert_eq!(s.dragging(), Some("genetics"));
        assert_eq!(s.simulation().position("genetics"), Some(target));
        assert!(!s.is_running());

        s.end_drag();
        assert!(s.dragging().is_none());
        assert!(s.is_running());
    }

    #[test]
    fn test_collapse_drops_drag_on_hidden_detail() {
        let mut s = session();
        s.toggle_expanded("cells").unwrap();
        s.settle();
        let held = Vec2::new(120.0, 90.0);
        assert!(s.begin_drag("nucleus", held));

        assert!(!s.toggle_expanded("cells").unwrap());
        assert!(s.dragging().is_none());
        let idx = s.simulation().index_of("nucleus").unwrap();
        assert!(!s.simulation().body(idx).unwrap().pinned);

        s.drag_to(Vec2::new(400.0, 300.0));
        assert_eq!(s.simulation().position("nucleus"), Some(held));
    }

    #[test]
    fn test_collapse_keeps_drag_on_other_branch() {
        let mut s = session();
        s.toggle_expanded("cells").unwrap();
        s.settle();
        assert!(s.begin_drag("genetics", Vec2::new(50.0, 50.0)));
        s.toggle_expanded("cells").unwrap();
        assert_eq!(s.dragging(), Some("genetics"));
    }

    #[test]
    fn test_core_and_hidden_nodes_not_draggable() {
        let mut s = session();
        assert!(!s.begin_drag(CORE_ID, Vec2::ZERO));
        assert!(!s.begin_drag("nucleus", Vec2::ZERO));
    }

    #[test]
    fn test_zoom_clamped_and_pan() {
        let mut s = session();
        assert_eq!(s.zoom_at(100.0, Vec2::ZERO), MAX_ZOOM);
        assert_eq!(s.zoom_at(0.0001, Vec2::ZERO), MIN_ZOOM);
        assert_eq!(s.zoom_at(f32::NAN, Vec2::ZERO), MIN_ZOOM);

        s.begin_pan(Vec2::new(10.0, 10.0));
        s.pan_to(Vec2::new(25.0, 5.0));
        s.end_pan();
        assert_eq!(s.viewport().pan, Vec2::new(15.0, -5.0));
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut s = session();
        let anchor = Vec2::new(300.0, 200.0);
        let before = s.viewport().to_world(anchor);
        s.zoom_at(2.0, anchor);
        let after = s.viewport().to_world(anchor);
        assert!((before - after).length() < 1e-3);
    }

    // ------------------------------------------------------------------------
    // Popup
    // ------------------------------------------------------------------------

    #[test]
    fn test_popup_deep_link_and_dismiss() {
        let mut s = session();
        let detail = s.select("genetics").unwrap().clone();
        assert_eq!(detail.link.as_deref(), Some("https://notes.example/#/g"));
        assert!(detail.note.is_none());
        s.click_background();
        assert!(s.popup().is_none());
    }

    #[test]
    fn test_popup_without_host_has_no_link() {
        let options = SessionOptions {
            host: None,
            ..options()
        };
        let mut s = LayoutSession::from_map(&biology_map(), options).unwrap();
        let detail = s.select("genetics").unwrap();
        assert!(detail.link.is_none());
        assert!(detail.note.is_none());
    }

    #[test]
    fn test_popup_for_inferred_concept() {
        let corpus = Corpus::new(vec![ContentNode::new("a", "Cats cause allergies")]);
        let map = ConceptGraphBuilder::new()
            .build(&corpus, &MapRequest::explicit(["cats", "allergies"]))
            .into_result()
            .unwrap();
        let mut s = LayoutSession::from_map(&map, options()).unwrap();
        let detail = s.select("cats").unwrap();
        assert!(detail.link.is_none());
        assert_eq!(detail.note, Some(INFERRED_CONCEPT));
    }

    #[test]
    fn test_popup_requires_visible_node() {
        let mut s = session();
        assert!(s.select("nucleus").is_err());
    }

    #[test]
    fn test_snapshot_marks_expandable_majors() {
        let s = session();
        let views = s.snapshot();
        let cells = views.iter().find(|v| v.id == "cells").unwrap();
        assert_eq!(cells.expanded, Some(false));
        let genetics = views.iter().find(|v| v.id == "genetics").unwrap();
        assert_eq!(genetics.expanded, None);
    }
}
