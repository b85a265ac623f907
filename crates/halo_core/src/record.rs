//! Recording surface
//!
//! [`DrawList`] implements [`DrawSurface`] by storing every primitive in
//! order. The renderer tessellates it; tests assert on it.

use crate::surface::{ClipRect, DrawSurface, Glow, Rgba, Stroke};
use glam::Vec2;

/// One recorded drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
        glow: Option<Glow>,
    },
    Line {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        stroke: Stroke,
    },
    Clip(Option<ClipRect>),
}

/// Ordered list of primitives drawn since the last clear.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    clears: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the surface has been cleared.
    pub fn clears(&self) -> u64 {
        self.clears
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Recorded lines as `(from, to, stroke)`.
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, Stroke)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            DrawCommand::Line { from, to, stroke } => Some((from, to, stroke)),
            _ => None,
        })
    }

    /// Recorded circles as `(center, radius, color)`.
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Rgba)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            DrawCommand::Circle {
                center,
                radius,
                color,
                ..
            } => Some((center, radius, color)),
            _ => None,
        })
    }

    pub fn arc_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Arc { .. }))
            .count()
    }
}

impl DrawSurface for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: Option<Glow>) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            glow,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, stroke: Stroke) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start,
            end,
            stroke,
        });
    }

    fn set_clip(&mut self, clip: Option<ClipRect>) {
        self.commands.push(DrawCommand::Clip(clip));
    }
}
