//! Ring and dust renderer
//!
//! Concentric glowing arcs around the radial field's center: a handful of
//! thin "dust" bands with independently phased shimmer, then the main ring
//! drawn as short segments whose opacity rolls with angle and rotation.
//!
//! The radial field only drives rings when `drive_rings` is set; otherwise a
//! [`Ring`] can be updated and drawn on its own.

use crate::error::{ensure_positive, ensure_within, ConfigError};
use crate::math::{random_angle, Span};
use crate::surface::{ClipRect, DrawSurface, Glow, Rgba, Stroke, SurfaceSize};
use crate::FrameReport;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

pub const DEFAULT_BASE_OPACITY: f32 = 0.015;
pub const DEFAULT_SEGMENTS: usize = 60;
pub const DEFAULT_DUST_BANDS: usize = 5;
pub const DEFAULT_DUST_SEGMENTS: usize = 40;
pub const DUST_LINE_WIDTH: f32 = 1.5;
pub const DUST_GLOW_BLUR: f32 = 15.0;
pub const SEGMENT_GLOW_BLUR: f32 = 20.0;
pub const RING_COLOR: Rgba = Rgba::rgb(200, 180, 255);

/// Glow alpha relative to the stroke alpha.
const DUST_GLOW_SHARE: f32 = 0.3;
const SEGMENT_GLOW_SHARE: f32 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub radius: f32,
    /// Stroke width of the main ring; dust bands spread across it.
    pub width: f32,
    /// Radians added to the ring angle per tick.
    pub speed: f32,
    /// Only draw the half above the center.
    pub upper_half_only: bool,
    pub base_opacity: f32,
    pub segments: usize,
    pub dust_bands: usize,
    pub dust_segments: usize,
    pub color: Rgba,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            radius: 180.0,
            width: 24.0,
            speed: 0.003,
            upper_half_only: false,
            base_opacity: DEFAULT_BASE_OPACITY,
            segments: DEFAULT_SEGMENTS,
            dust_bands: DEFAULT_DUST_BANDS,
            dust_segments: DEFAULT_DUST_SEGMENTS,
            color: RING_COLOR,
        }
    }
}

impl RingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("ring.radius", self.radius)?;
        ensure_within("ring.width", self.width, 0.0, f32::MAX)?;
        ensure_within("ring.base_opacity", self.base_opacity, 0.0, 1.0)?;
        if self.segments == 0 {
            return Err(ConfigError::EmptyPool {
                name: "ring.segments",
            });
        }
        if self.dust_bands > 0 && self.dust_segments == 0 {
            return Err(ConfigError::EmptyPool {
                name: "ring.dust_segments",
            });
        }
        Ok(())
    }
}

/// One thin band of dust riding alongside the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DustBand {
    /// Offset from the ring radius, within `±width / 2`.
    pub radius_offset: f32,
    pub opacity: f32,
    pub phase_offset: f32,
}

#[derive(Debug, Clone)]
pub struct Ring {
    config: RingConfig,
    angle: f32,
    dust: Vec<DustBand>,
}

impl Ring {
    pub fn new<R: Rng + ?Sized>(config: RingConfig, rng: &mut R) -> Self {
        let b = config.base_opacity;
        let dust_opacity = Span::new(b * 0.5, b * 1.3);
        let count = config.dust_bands;
        let dust = (0..count)
            .map(|i| DustBand {
                radius_offset: dust_offset(i, count, config.width),
                opacity: dust_opacity.sample(rng),
                phase_offset: random_angle(rng),
            })
            .collect();

        Self {
            config,
            angle: 0.0,
            dust,
        }
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn dust_bands(&self) -> &[DustBand] {
        &self.dust
    }

    pub fn update(&mut self) {
        self.angle += self.config.speed;
    }

    /// Opacity of segment `i` of a dust band at the current angle.
    pub fn dust_segment_opacity(&self, band: &DustBand, i: usize) -> f32 {
        let n = self.config.dust_segments as f32;
        let variation = ((i as f32 / n * PI * 3.0 + self.angle * 2.0).sin() + 1.0) / 2.0;
        band.opacity * (0.5 + 0.5 * variation)
    }

    /// Opacity of main ring segment `i` at the current angle.
    pub fn segment_opacity(&self, i: usize) -> f32 {
        let n = self.config.segments as f32;
        let b = self.config.base_opacity;
        let variation = ((i as f32 / n * PI * 5.0 + self.angle * 3.0).sin() + 1.0) / 2.0;
        b + b * 1.5 * variation
    }

    /// Clip region for upper-half mode: everything above `center`.
    pub fn upper_half(center: Vec2, bounds: SurfaceSize) -> ClipRect {
        ClipRect::new(
            Vec2::new(center.x - bounds.width, center.y - bounds.height),
            Vec2::new(bounds.width * 2.0, bounds.height),
        )
    }

    pub fn draw<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        center: Vec2,
        bounds: SurfaceSize,
    ) -> FrameReport {
        let mut report = FrameReport::default();

        if self.config.upper_half_only {
            surface.set_clip(Some(Self::upper_half(center, bounds)));
        }

        let dust_step = TAU / self.config.dust_segments.max(1) as f32;
        for band in &self.dust {
            let radius = self.config.radius + band.radius_offset;
            for i in 0..self.config.dust_segments {
                let start = i as f32 * dust_step + self.angle + band.phase_offset;
                let alpha = self.dust_segment_opacity(band, i);
                surface.stroke_arc(
                    center,
                    radius,
                    start,
                    start + dust_step,
                    Stroke {
                        width: DUST_LINE_WIDTH,
                        color: self.config.color.with_alpha(alpha),
                        glow: Some(Glow {
                            blur: DUST_GLOW_BLUR,
                            color: self.config.color.with_alpha(alpha * DUST_GLOW_SHARE),
                        }),
                    },
                );
                report.arcs += 1;
            }
        }

        let step = TAU / self.config.segments.max(1) as f32;
        for i in 0..self.config.segments {
            let start = i as f32 * step + self.angle;
            let alpha = self.segment_opacity(i);
            surface.stroke_arc(
                center,
                self.config.radius,
                start,
                start + step,
                Stroke {
                    width: self.config.width,
                    color: self.config.color.with_alpha(alpha),
                    glow: Some(Glow {
                        blur: SEGMENT_GLOW_BLUR,
                        color: self.config.color.with_alpha(alpha * SEGMENT_GLOW_SHARE),
                    }),
                },
            );
            report.arcs += 1;
        }

        if self.config.upper_half_only {
            surface.set_clip(None);
        }

        report
    }
}

/// Radius offset of dust band `i` of `count`, spread evenly across `width`.
fn dust_offset(i: usize, count: usize, width: f32) -> f32 {
    if count < 2 {
        return 0.0;
    }
    -width / 2.0 + (i as f32 / (count - 1) as f32) * width
}
