//! Headless force-directed simulation.
//!
//! The simulation owns positions and velocities for every concept, visible
//! or not. Each step only moves the bodies it is given, so hidden details
//! keep their last position until they are revealed and reseeded.

use lexigraph_graph::{ConceptNode, Level};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::geometry::{Canvas, Vec2};
use crate::params::PhysicsParams;

/// Maximum offset of a seeded detail from its parent, per axis.
pub const JITTER: f32 = 24.0;

/// Radius of the core node.
pub const CORE_RADIUS: f32 = 36.0;
/// Radius of major nodes.
pub const MAJOR_RADIUS: f32 = 24.0;
/// Radius of detail nodes.
pub const DETAIL_RADIUS: f32 = 14.0;

/// Fraction of the inner half-extent used for the initial major ring.
const RING_FRACTION: f32 = 0.55;

const MIN_DISTANCE: f32 = 0.01;

/// Physical state of one concept.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Concept id.
    pub id: String,
    /// Collision radius.
    pub radius: f32,
    /// Current position.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Force-immune (core always; other nodes while dragged).
    pub pinned: bool,
    fixed: bool,
}

impl Body {
    /// Whether the body is permanently pinned.
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }
}

/// A spring between two bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    /// Hierarchy springs rest shorter.
    pub hierarchy: bool,
}

/// Annealed force simulation over a set of bodies.
#[derive(Clone, Debug)]
pub struct Simulation {
    bodies: Vec<Body>,
    index: HashMap<String, usize>,
    params: PhysicsParams,
    canvas: Canvas,
    temperature: f32,
    rng: StdRng,
}

impl Simulation {
    /// Creates bodies for `nodes` and places them: core at the center,
    /// majors on a ring, details jittered around their parent.
    pub fn new(nodes: &[ConceptNode], params: PhysicsParams, canvas: Canvas, rng: StdRng) -> Self {
        let center = canvas.center();
        let bodies: Vec<Body> = nodes
            .iter()
            .map(|node| {
                let (radius, fixed) = match node.level {
                    Level::Core => (CORE_RADIUS, true),
                    Level::Major => (MAJOR_RADIUS, false),
                    Level::Detail => (DETAIL_RADIUS, false),
                };
                Body {
                    id: node.id.clone(),
                    radius,
                    position: center,
                    velocity: Vec2::ZERO,
                    pinned: fixed,
                    fixed,
                }
            })
            .collect();
        let index = bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id.clone(), i))
            .collect();

        let mut sim = Self {
            bodies,
            index,
            params: params.sanitized(),
            canvas,
            temperature: 1.0,
            rng,
        };
        sim.place(nodes);
        sim
    }

    fn place(&mut self, nodes: &[ConceptNode]) {
        let center = self.canvas.center();
        let ring = self.ring_radius();
        let majors: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.level == Level::Major)
            .map(|(i, _)| i)
            .collect();

        for (k, &i) in majors.iter().enumerate() {
            let angle = TAU * k as f32 / majors.len() as f32 - FRAC_PI_2;
            let p = center + Vec2::new(angle.cos(), angle.sin()) * ring;
            self.bodies[i].position = self.canvas.clamp(p);
        }

        for (i, node) in nodes.iter().enumerate() {
            if node.level != Level::Detail {
                continue;
            }
            let anchor = node
                .parent_major_id
                .as_deref()
                .and_then(|p| self.index_of(p))
                .map_or(center, |p| self.bodies[p].position);
            self.seed_at(i, anchor);
        }
    }

    /// Radius of the initial major ring.
    pub fn ring_radius(&self) -> f32 {
        let (min, max) = self.canvas.bounds();
        ((max.x - min.x).min(max.y - min.y) / 2.0 * RING_FRACTION).max(0.0)
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns `true` if there are no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Index of a concept id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// All bodies.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Body by index.
    pub fn body(&self, idx: usize) -> Option<&Body> {
        self.bodies.get(idx)
    }

    /// Position of a concept.
    pub fn position(&self, id: &str) -> Option<Vec2> {
        self.index_of(id).map(|i| self.bodies[i].position)
    }

    /// Current parameters.
    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Replaces the parameters (sanitized).
    pub fn set_params(&mut self, params: PhysicsParams) {
        self.params = params.sanitized();
    }

    /// The canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Current temperature (1.0 after a reheat, decays by `cooling`).
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Resets the temperature for a new burst.
    pub fn reheat(&mut self) {
        self.temperature = 1.0;
    }

    /// Places a body near another with random jitter and zero velocity.
    pub fn seed_near(&mut self, idx: usize, anchor: usize) {
        if let Some(anchor) = self.bodies.get(anchor).map(|b| b.position) {
            self.seed_at(idx, anchor);
        }
    }

    fn seed_at(&mut self, idx: usize, anchor: Vec2) {
        if idx >= self.bodies.len() || self.bodies[idx].fixed {
            return;
        }
        let jitter = Vec2::new(
            self.rng.gen_range(-JITTER..=JITTER),
            self.rng.gen_range(-JITTER..=JITTER),
        );
        let body = &mut self.bodies[idx];
        body.position = self.canvas.clamp(anchor + jitter);
        body.velocity = Vec2::ZERO;
    }

    /// Pins a body at a point (clamped to the canvas). Returns `false` for
    /// fixed bodies and unknown indices.
    pub fn pin(&mut self, idx: usize, at: Vec2) -> bool {
        let canvas = self.canvas;
        match self.bodies.get_mut(idx) {
            Some(body) if !body.fixed => {
                body.pinned = true;
                body.position = canvas.clamp(at);
                body.velocity = Vec2::ZERO;
                true
            }
            _ => false,
        }
    }

    /// Releases a pinned body. Fixed bodies stay pinned.
    pub fn release(&mut self, idx: usize) {
        if let Some(body) = self.bodies.get_mut(idx) {
            body.pinned = body.fixed;
        }
    }

    /// Advances one iteration over the `visible` bodies and `links`.
    /// Indices out of range are ignored.
    pub fn step(&mut self, visible: &[usize], links: &[Link]) {
        let n = self.bodies.len();
        let visible: Vec<usize> = visible.iter().copied().filter(|&i| i < n).collect();
        let p = &self.params;
        let mut forces = vec![Vec2::ZERO; n];

        // Repulsion, amplified inside the overlap distance.
        for (k, &i) in visible.iter().enumerate() {
            for &j in &visible[k + 1..] {
                let delta = self.bodies[i].position - self.bodies[j].position;
                let distance = delta.length().max(MIN_DISTANCE);
                let direction = if delta.length() > MIN_DISTANCE {
                    delta / distance
                } else {
                    let angle = (i as f32 * 0.618_034 + j as f32 * 0.414_214) * TAU;
                    Vec2::new(angle.cos(), angle.sin())
                };

                let mut push = p.repulsion / (distance * distance);
                let min_distance = self.bodies[i].radius + self.bodies[j].radius + p.overlap_margin;
                if distance < min_distance {
                    push += (min_distance - distance) * p.overlap_strength;
                }
                forces[i] += direction * push;
                forces[j] -= direction * push;
            }
        }

        // Springs along visible links.
        for link in links {
            if link.a >= n || link.b >= n || link.a == link.b {
                continue;
            }
            let delta = self.bodies[link.b].position - self.bodies[link.a].position;
            let distance = delta.length();
            if distance <= MIN_DISTANCE {
                continue;
            }
            let pull = (distance - p.rest_length(link.hierarchy)) * p.spring_strength;
            let correction = delta / distance * pull;
            forces[link.a] += correction;
            forces[link.b] -= correction;
        }

        // Gravity toward the center.
        let center = self.canvas.center();
        for &i in &visible {
            forces[i] += (center - self.bodies[i].position) * p.gravity;
        }

        // Integrate, damp, cap, clamp.
        let (damping, max_speed, temperature) = (p.damping, p.max_speed, self.temperature);
        let canvas = self.canvas;
        for &i in &visible {
            let body = &mut self.bodies[i];
            if body.pinned {
                body.velocity = Vec2::ZERO;
                continue;
            }
            let mut velocity = (body.velocity + forces[i] * temperature) * damping;
            let speed = velocity.length();
            if !speed.is_finite() {
                velocity = Vec2::ZERO;
            } else if speed > max_speed {
                velocity = velocity / speed * max_speed;
            }

            let target = body.position + velocity;
            let clamped = canvas.clamp(target);
            if clamped.x != target.x {
                velocity.x = 0.0;
            }
            if clamped.y != target.y {
                velocity.y = 0.0;
            }
            body.position = clamped;
            body.velocity = velocity;
        }

        self.temperature *= self.params.cooling;
    }

    /// Runs `iterations` steps.
    pub fn run(&mut self, visible: &[usize], links: &[Link], iterations: usize) {
        for _ in 0..iterations {
            self.step(visible, links);
        }
    }
}
