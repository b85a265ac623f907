//! Halo Core
//!
//! Simulation side of the portfolio page effects:
//! - Drawing surface abstraction and a recording surface
//! - Ambient particle field (hero section)
//! - Radial infall field and ring renderer ("black hole")
//! - Fixed-rate frame clock
//! - Page chrome decision helpers

pub mod ambient;
pub mod chrome;
pub mod error;
pub mod math;
pub mod radial;
pub mod record;
pub mod ring;
pub mod surface;
pub mod time;

pub use glam;

pub use error::ConfigError;
pub use record::{DrawCommand, DrawList};
pub use surface::{ClipRect, DrawSurface, Glow, Rgba, Stroke, SurfaceSize};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What a field emitted and changed during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub circles: usize,
    pub lines: usize,
    pub arcs: usize,
    pub respawns: usize,
}

impl std::ops::AddAssign for FrameReport {
    fn add_assign(&mut self, other: Self) {
        self.circles += other.circles;
        self.lines += other.lines;
        self.arcs += other.arcs;
        self.respawns += other.respawns;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn reports_accumulate() {
        let mut total = FrameReport {
            circles: 2,
            ..Default::default()
        };
        total += FrameReport {
            circles: 1,
            lines: 4,
            arcs: 0,
            respawns: 1,
        };
        assert_eq!(
            total,
            FrameReport {
                circles: 3,
                lines: 4,
                arcs: 0,
                respawns: 1,
            }
        );
    }
}
