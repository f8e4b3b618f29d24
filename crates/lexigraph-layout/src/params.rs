//! Physics parameters.
//!
//! Five parameters are exposed as live controls. Every setter clamps to the
//! parameter's range and returns the value actually applied so the control
//! can display it.

use lexigraph_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hierarchy springs rest at this fraction of the link distance.
pub const HIERARCHY_REST_RATIO: f32 = 0.6;

/// A user-tunable physics parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Pairwise repulsion strength.
    Repulsion,
    /// Spring rest length for semantic edges.
    LinkDistance,
    /// Pull toward the canvas center.
    Gravity,
    /// Fraction of velocity kept per step.
    Damping,
    /// Extra push between overlapping nodes.
    OverlapStrength,
}

/// Inclusive range and slider step of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParamRange {
    /// Smallest allowed value.
    pub min: f32,
    /// Largest allowed value.
    pub max: f32,
    /// Slider increment.
    pub step: f32,
}

impl ParamRange {
    /// Clamps `value` into the range. Non-finite input yields `None`.
    pub fn clamp(&self, value: f32) -> Option<f32> {
        value.is_finite().then(|| value.clamp(self.min, self.max))
    }
}

impl ParamKind {
    /// Every exposed parameter, in control order.
    pub const ALL: [ParamKind; 5] = [
        ParamKind::Repulsion,
        ParamKind::LinkDistance,
        ParamKind::Gravity,
        ParamKind::Damping,
        ParamKind::OverlapStrength,
    ];

    /// Snake-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Repulsion => "repulsion",
            Self::LinkDistance => "link_distance",
            Self::Gravity => "gravity",
            Self::Damping => "damping",
            Self::OverlapStrength => "overlap_strength",
        }
    }

    /// Control label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Repulsion => "Repulsion",
            Self::LinkDistance => "Link distance",
            Self::Gravity => "Gravity",
            Self::Damping => "Damping",
            Self::OverlapStrength => "Overlap avoidance",
        }
    }

    /// Allowed range.
    pub fn range(&self) -> ParamRange {
        match self {
            Self::Repulsion => ParamRange {
                min: 1_000.0,
                max: 60_000.0,
                step: 500.0,
            },
            Self::LinkDistance => ParamRange {
                min: 40.0,
                max: 320.0,
                step: 5.0,
            },
            Self::Gravity => ParamRange {
                min: 0.0,
                max: 0.2,
                step: 0.005,
            },
            Self::Damping => ParamRange {
                min: 0.5,
                max: 0.98,
                step: 0.01,
            },
            Self::OverlapStrength => ParamRange {
                min: 0.0,
                max: 5.0,
                step: 0.1,
            },
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == normalized)
            .ok_or_else(|| Error::parse(format!("unknown physics parameter: {s}")))
    }
}

/// Physics configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    /// Pairwise repulsion strength (inverse-square).
    #[serde(default = "default_repulsion")]
    pub repulsion: f32,
    /// Rest length of semantic springs; hierarchy springs are shorter.
    #[serde(default = "default_link_distance")]
    pub link_distance: f32,
    /// Pull toward the canvas center.
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Fraction of velocity kept per step.
    #[serde(default = "default_damping")]
    pub damping: f32,
    /// Extra push between nodes closer than their radii plus margin.
    #[serde(default = "default_overlap_strength")]
    pub overlap_strength: f32,
    /// Spring stiffness.
    #[serde(default = "default_spring_strength")]
    pub spring_strength: f32,
    /// Gap added to the sum of radii before overlap avoidance kicks in.
    #[serde(default = "default_overlap_margin")]
    pub overlap_margin: f32,
    /// Iterations of the initial settle.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Iterations of a re-settle burst after an interaction.
    #[serde(default = "default_burst_iterations")]
    pub burst_iterations: usize,
    /// Temperature multiplier applied after every iteration.
    #[serde(default = "default_cooling")]
    pub cooling: f32,
    /// Speed cap per iteration.
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
}

fn default_repulsion() -> f32 {
    12_000.0
}

fn default_link_distance() -> f32 {
    140.0
}

fn default_gravity() -> f32 {
    0.02
}

fn default_damping() -> f32 {
    0.85
}

fn default_overlap_strength() -> f32 {
    1.5
}

fn default_spring_strength() -> f32 {
    0.04
}

fn default_overlap_margin() -> f32 {
    12.0
}

fn default_iterations() -> usize {
    300
}

fn default_burst_iterations() -> usize {
    80
}

fn default_cooling() -> f32 {
    0.985
}

fn default_max_speed() -> f32 {
    40.0
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            repulsion: default_repulsion(),
            link_distance: default_link_distance(),
            gravity: default_gravity(),
            damping: default_damping(),
            overlap_strength: default_overlap_strength(),
            spring_strength: default_spring_strength(),
            overlap_margin: default_overlap_margin(),
            iterations: default_iterations(),
            burst_iterations: default_burst_iterations(),
            cooling: default_cooling(),
            max_speed: default_max_speed(),
        }
    }
}

impl PhysicsParams {
    /// Current value of an exposed parameter.
    pub fn get(&self, kind: ParamKind) -> f32 {
        match kind {
            ParamKind::Repulsion => self.repulsion,
            ParamKind::LinkDistance => self.link_distance,
            ParamKind::Gravity => self.gravity,
            ParamKind::Damping => self.damping,
            ParamKind::OverlapStrength => self.overlap_strength,
        }
    }

    /// Sets an exposed parameter, clamped to its range, and returns the
    /// value applied. Non-finite input leaves the parameter unchanged.
    pub fn set(&mut self, kind: ParamKind, value: f32) -> f32 {
        let Some(applied) = kind.range().clamp(value) else {
            log::debug!("ignoring non-finite value for {kind}");
            return self.get(kind);
        };
        match kind {
            ParamKind::Repulsion => self.repulsion = applied,
            ParamKind::LinkDistance => self.link_distance = applied,
            ParamKind::Gravity => self.gravity = applied,
            ParamKind::Damping => self.damping = applied,
            ParamKind::OverlapStrength => self.overlap_strength = applied,
        }
        applied
    }

    /// Copy with every exposed parameter clamped and the internal ones made
    /// finite and non-negative.
    pub fn sanitized(&self) -> Self {
        let mut out = Self::default();
        for kind in ParamKind::ALL {
            out.set(kind, self.get(kind));
        }
        let non_negative = |v: f32, fallback: f32| if v.is_finite() && v >= 0.0 { v } else { fallback };
        out.spring_strength = non_negative(self.spring_strength, out.spring_strength);
        out.overlap_margin = non_negative(self.overlap_margin, out.overlap_margin);
        out.max_speed = non_negative(self.max_speed, out.max_speed);
        out.cooling = if self.cooling.is_finite() {
            self.cooling.clamp(0.5, 1.0)
        } else {
            out.cooling
        };
        out.iterations = self.iterations;
        out.burst_iterations = self.burst_iterations;
        out
    }

    /// Rest length for a spring.
    pub fn rest_length(&self, hierarchy: bool) -> f32 {
        if hierarchy {
            self.link_distance * HIERARCHY_REST_RATIO
        } else {
            self.link_distance
        }
    }
}
