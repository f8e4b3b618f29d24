//! Points and the canvas rectangle.

use lexigraph_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

/// A 2D vector in canvas coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

/// The drawing surface. Nodes are kept inside it minus `padding`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_padding")]
    pub padding: f32,
}

fn default_width() -> f32 {
    1200.0
}

fn default_height() -> f32 {
    800.0
}

fn default_padding() -> f32 {
    40.0
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            padding: default_padding(),
        }
    }
}

impl Canvas {
    /// Creates a canvas, rejecting non-positive or non-finite sizes.
    pub fn new(width: f32, height: f32, padding: f32) -> Result<Self> {
        let canvas = Self {
            width,
            height,
            padding,
        };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Checks the dimensions.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::config(format!("canvas width must be positive, got {}", self.width)));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(Error::config(format!("canvas height must be positive, got {}", self.height)));
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(Error::config(format!("canvas padding must be non-negative, got {}", self.padding)));
        }
        Ok(())
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Inner rectangle `(min, max)`. Collapses to the center line when the
    /// padding exceeds half a dimension.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let pad_x = self.padding.min(self.width / 2.0);
        let pad_y = self.padding.min(self.height / 2.0);
        (
            Vec2::new(pad_x, pad_y),
            Vec2::new(self.width - pad_x, self.height - pad_y),
        )
    }

    /// Clamps a point into the inner rectangle. Non-finite points snap to
    /// the center.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        if !p.is_finite() {
            return self.center();
        }
        let (min, max) = self.bounds();
        Vec2::new(p.x.clamp(min.x, max.x), p.y.clamp(min.y, max.y))
    }

    /// Whether a point lies in the inner rectangle.
    pub fn contains(&self, p: Vec2) -> bool {
        let (min, max) = self.bounds();
        p.is_finite() && p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }
}
