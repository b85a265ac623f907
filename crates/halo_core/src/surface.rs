//! Drawing surface abstraction
//!
//! Fields never touch a canvas directly. They emit primitives through
//! [`DrawSurface`]; the runtime records them into a [`crate::DrawList`] and
//! hands that to the GPU renderer, while tests inspect the list directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Colour with 8-bit channels and a float alpha, the way CSS `rgba()` spells it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Normalized `[r, g, b, a]` with alpha clamped to `[0, 1]`.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a.clamp(0.0, 1.0),
        ]
    }
}

/// Soft halo drawn around a primitive (canvas `shadowBlur` / `shadowColor`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub blur: f32,
    pub color: Rgba,
}

/// Line style for strokes. Arc ends are rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Rgba,
    pub glow: Option<Glow>,
}

/// Pixel dimensions of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether `point` lies in `[0, width) × [0, height)`.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x < self.width && point.y >= 0.0 && point.y < self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned clip rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl ClipRect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.x < max.x && point.y >= self.origin.y && point.y < max.y
    }

    /// Part of the rectangle that lies on the surface, if any.
    pub fn intersect(&self, bounds: SurfaceSize) -> Option<ClipRect> {
        let min = self.origin.max(Vec2::ZERO);
        let max = self.max().min(Vec2::new(bounds.width, bounds.height));
        if max.x <= min.x || max.y <= min.y {
            return None;
        }
        Some(ClipRect::new(min, max - min))
    }
}

/// 2D drawing surface the fields render into.
pub trait DrawSurface {
    /// Wipe everything drawn so far.
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: Option<Glow>);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke);

    /// Stroke the arc of `radius` around `center` from `start` to `end`
    /// radians, clockwise on a y-down surface.
    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, stroke: Stroke);

    /// Restrict subsequent primitives to `clip`; `None` lifts the restriction.
    fn set_clip(&mut self, clip: Option<ClipRect>);
}
