//! Draw list tessellation
//!
//! Turns recorded primitives into a flat triangle list in normalized device
//! coordinates. Circles become fans, lines become quads, arcs become quad
//! strips with round caps. Glows are drawn first as a gradient that fades
//! to transparent over the blur distance.

use halo_core::{ClipRect, DrawCommand, DrawList, Glow, Rgba, Stroke, SurfaceSize};
use glam::Vec2;
use std::f32::consts::TAU;
use std::ops::Range;

const MIN_CIRCLE_SLICES: usize = 8;
const MAX_CIRCLE_SLICES: usize = 48;
/// Largest angle covered by one circle or arc slice.
const MAX_SLICE_ANGLE: f32 = TAU / MAX_CIRCLE_SLICES as f32;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Vertices drawn under one scissor rectangle; `None` is the whole surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub vertices: Range<u32>,
    pub scissor: Option<ClipRect>,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub batches: Vec<Batch>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scissor {
    Full,
    Rect(ClipRect),
    /// The clip lies entirely off the surface.
    Hidden,
}

pub struct Tessellator {
    size: SurfaceSize,
    mesh: Mesh,
    scissor: Scissor,
    batch_start: u32,
}

impl Tessellator {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            mesh: Mesh::default(),
            scissor: Scissor::Full,
            batch_start: 0,
        }
    }

    /// Tessellate a whole draw list for a surface of `size`.
    pub fn tessellate(list: &DrawList, size: SurfaceSize) -> Mesh {
        let mut tess = Self::new(size);
        for command in list.commands() {
            tess.push(command);
        }
        tess.finish()
    }

    pub fn push(&mut self, command: &DrawCommand) {
        match *command {
            DrawCommand::Circle {
                center,
                radius,
                color,
                glow,
            } => {
                if let Some(glow) = glow {
                    self.circle_glow(center, radius, glow);
                }
                self.circle(center, radius, color);
            }
            DrawCommand::Line { from, to, stroke } => self.line(from, to, stroke),
            DrawCommand::Arc {
                center,
                radius,
                start,
                end,
                stroke,
            } => self.arc(center, radius, start, end, stroke),
            DrawCommand::Clip(clip) => self.set_clip(clip),
        }
    }

    pub fn finish(mut self) -> Mesh {
        self.flush();
        self.mesh
    }

    fn set_clip(&mut self, clip: Option<ClipRect>) {
        self.flush();
        self.scissor = match clip {
            None => Scissor::Full,
            Some(rect) => match rect.intersect(self.size) {
                Some(visible) => Scissor::Rect(visible),
                None => Scissor::Hidden,
            },
        };
    }

    fn flush(&mut self) {
        let end = self.mesh.vertices.len() as u32;
        if end > self.batch_start {
            let scissor = match self.scissor {
                Scissor::Rect(rect) => Some(rect),
                _ => None,
            };
            self.mesh.batches.push(Batch {
                vertices: self.batch_start..end,
                scissor,
            });
        }
        self.batch_start = end;
    }

    fn to_ndc(&self, p: Vec2) -> [f32; 2] {
        [
            p.x / self.size.width * 2.0 - 1.0,
            1.0 - p.y / self.size.height * 2.0,
        ]
    }

    fn triangle(&mut self, points: [(Vec2, [f32; 4]); 3]) {
        if self.scissor == Scissor::Hidden {
            return;
        }
        for (p, color) in points {
            let position = self.to_ndc(p);
            self.mesh.vertices.push(Vertex { position, color });
        }
    }

    /// Quad `a b c d` (in order around its edge) with per-corner colours.
    fn quad(&mut self, corners: [(Vec2, [f32; 4]); 4]) {
        let [a, b, c, d] = corners;
        self.triangle([a, b, c]);
        self.triangle([a, c, d]);
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.fan(center, radius, color.to_f32(), color.to_f32());
    }

    /// Soft disc behind a circle, fading out `blur` pixels past its edge.
    fn circle_glow(&mut self, center: Vec2, radius: f32, glow: Glow) {
        let inner = glow.color.to_f32();
        let outer = glow.color.with_alpha(0.0).to_f32();
        self.fan(center, radius + glow.blur, inner, outer);
    }

    fn fan(&mut self, center: Vec2, radius: f32, inner: [f32; 4], outer: [f32; 4]) {
        if radius <= 0.0 {
            return;
        }
        let slices = circle_slices(radius);
        let step = TAU / slices as f32;
        for i in 0..slices {
            let a0 = i as f32 * step;
            let a1 = a0 + step;
            self.triangle([
                (center, inner),
                (center + Vec2::from_angle(a0) * radius, outer),
                (center + Vec2::from_angle(a1) * radius, outer),
            ]);
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        let along = to - from;
        let Some(dir) = along.try_normalize() else {
            return;
        };
        let normal = dir.perp() * (stroke.width / 2.0);
        let color = stroke.color.to_f32();
        self.quad([
            (from + normal, color),
            (to + normal, color),
            (to - normal, color),
            (from - normal, color),
        ]);
    }

    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, stroke: Stroke) {
        let sweep = end - start;
        if sweep.abs() <= f32::EPSILON {
            return;
        }
        let slices = ((sweep.abs() / MAX_SLICE_ANGLE).ceil() as usize).max(1);
        let step = sweep / slices as f32;
        let half = stroke.width / 2.0;

        if let Some(glow) = stroke.glow {
            let core = glow.color.to_f32();
            let clear = glow.color.with_alpha(0.0).to_f32();
            let reach = half + glow.blur;
            for i in 0..slices {
                let (a0, a1) = (start + i as f32 * step, start + (i + 1) as f32 * step);
                self.band(center, a0, a1, radius, (radius - reach).max(0.0), core, clear);
                self.band(center, a0, a1, radius, radius + reach, core, clear);
            }
        }

        let color = stroke.color.to_f32();
        for i in 0..slices {
            let (a0, a1) = (start + i as f32 * step, start + (i + 1) as f32 * step);
            self.band(center, a0, a1, (radius - half).max(0.0), radius + half, color, color);
        }

        // Round caps
        self.circle(Vec2::from_angle(start) * radius + center, half, stroke.color);
        self.circle(Vec2::from_angle(end) * radius + center, half, stroke.color);
    }

    /// Ring slice between angles `a0..a1` and radii `r_from..r_to`.
    #[allow(clippy::too_many_arguments)]
    fn band(
        &mut self,
        center: Vec2,
        a0: f32,
        a1: f32,
        r_from: f32,
        r_to: f32,
        from_color: [f32; 4],
        to_color: [f32; 4],
    ) {
        let (d0, d1) = (Vec2::from_angle(a0), Vec2::from_angle(a1));
        self.quad([
            (center + d0 * r_from, from_color),
            (center + d1 * r_from, from_color),
            (center + d1 * r_to, to_color),
            (center + d0 * r_to, to_color),
        ]);
    }
}

fn circle_slices(radius: f32) -> usize {
    let by_size = (radius * 2.0).ceil() as usize;
    by_size.clamp(MIN_CIRCLE_SLICES, MAX_CIRCLE_SLICES)
}
