//! Ambient particle field
//!
//! Hero-section decoration: a fixed pool of slowly drifting particles that
//! wrap at the surface edges and are joined by faint lines when close.
//!
//! The link pass compares every pair of particles each frame. Pools are
//! small (100 by default), so there is no spatial index; raising
//! `particle_count` far beyond that grows the frame cost quadratically.

use crate::error::{ensure_positive, ensure_within, ConfigError};
use crate::math::{wrap_axis, Span};
use crate::surface::{DrawSurface, Rgba, Stroke, SurfaceSize};
use crate::FrameReport;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PARTICLE_COUNT: usize = 100;
pub const DEFAULT_DRIFT_SPEED: f32 = 0.3;
pub const DEFAULT_RADIUS: Span = Span::new(1.0, 3.5);
pub const DEFAULT_OPACITY: Span = Span::new(0.3, 0.9);
pub const DEFAULT_LINK_DISTANCE: f32 = 120.0;
pub const DEFAULT_LINK_OPACITY: f32 = 0.15;
pub const DEFAULT_LINK_WIDTH: f32 = 0.7;

pub const VIOLET: Rgba = Rgba::rgb(157, 78, 221);
pub const SILVER: Rgba = Rgba::rgb(192, 192, 192);

/// Tunables for the ambient field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub particle_count: usize,
    /// Per-axis velocity is drawn from `[-drift_speed, drift_speed)`.
    pub drift_speed: f32,
    pub radius: Span,
    pub opacity: Span,
    /// Chance of a particle taking `primary_tint` instead of `secondary_tint`.
    pub primary_share: f32,
    pub primary_tint: Rgba,
    pub secondary_tint: Rgba,
    /// Pairs closer than this are linked.
    pub link_distance: f32,
    /// Link opacity at distance zero.
    pub link_opacity: f32,
    pub link_width: f32,
    pub link_color: Rgba,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            drift_speed: DEFAULT_DRIFT_SPEED,
            radius: DEFAULT_RADIUS,
            opacity: DEFAULT_OPACITY,
            primary_share: 0.5,
            primary_tint: VIOLET,
            secondary_tint: SILVER,
            link_distance: DEFAULT_LINK_DISTANCE,
            link_opacity: DEFAULT_LINK_OPACITY,
            link_width: DEFAULT_LINK_WIDTH,
            link_color: VIOLET,
        }
    }
}

impl AmbientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_within("ambient.drift_speed", self.drift_speed, 0.0, f32::MAX)?;
        self.radius.validate("ambient.radius")?;
        self.opacity.validate("ambient.opacity")?;
        ensure_within("ambient.primary_share", self.primary_share, 0.0, 1.0)?;
        ensure_positive("ambient.link_distance", self.link_distance)?;
        ensure_within("ambient.link_opacity", self.link_opacity, 0.0, 1.0)?;
        ensure_positive("ambient.link_width", self.link_width)?;
        Ok(())
    }
}

/// Free-floating particle with constant velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub tint: Rgba,
}

impl Particle {
    /// Random particle somewhere on a surface of size `bounds`.
    pub fn spawn<R: Rng + ?Sized>(bounds: SurfaceSize, config: &AmbientConfig, rng: &mut R) -> Self {
        let drift = Span::symmetric(config.drift_speed);
        let position = Vec2::new(
            Span::new(0.0, bounds.width).sample(rng),
            Span::new(0.0, bounds.height).sample(rng),
        );
        let velocity = Vec2::new(drift.sample(rng), drift.sample(rng));
        let radius = config.radius.sample(rng);
        let opacity = config.opacity.sample(rng);
        let tint = if rng.gen::<f32>() < config.primary_share {
            config.primary_tint
        } else {
            config.secondary_tint
        };

        Self {
            position,
            velocity,
            radius,
            opacity,
            tint,
        }
    }

    /// Advance by one velocity step, wrapping at the surface edges.
    pub fn step(&mut self, bounds: SurfaceSize) {
        self.position += self.velocity;
        self.position.x = wrap_axis(self.position.x, bounds.width);
        self.position.y = wrap_axis(self.position.y, bounds.height);
    }

    pub fn color(&self) -> Rgba {
        self.tint.with_alpha(self.opacity)
    }
}

/// Link opacity for two particles `distance` apart: `max_opacity` at zero,
/// falling linearly to zero at `threshold` and beyond.
pub fn link_opacity(distance: f32, threshold: f32, max_opacity: f32) -> f32 {
    if distance >= threshold {
        return 0.0;
    }
    max_opacity * (1.0 - distance / threshold)
}

/// Running ambient field bound to one surface.
#[derive(Debug, Clone)]
pub struct AmbientField {
    config: AmbientConfig,
    bounds: SurfaceSize,
    particles: Vec<Particle>,
}

impl AmbientField {
    /// Start the field on `target`. An absent target means there is nothing
    /// to decorate, and the field stays off.
    pub fn start<R: Rng + ?Sized>(
        target: Option<SurfaceSize>,
        config: AmbientConfig,
        rng: &mut R,
    ) -> Option<Self> {
        let Some(bounds) = target else {
            tracing::debug!("ambient field: no target surface, skipping");
            return None;
        };

        let particles = (0..config.particle_count)
            .map(|_| Particle::spawn(bounds, &config, rng))
            .collect();

        tracing::info!(
            particles = config.particle_count,
            width = bounds.width,
            height = bounds.height,
            "ambient field started"
        );

        Some(Self::with_particles(bounds, config, particles))
    }

    /// Field with an explicit particle pool.
    pub fn with_particles(bounds: SurfaceSize, config: AmbientConfig, particles: Vec<Particle>) -> Self {
        Self {
            config,
            bounds,
            particles,
        }
    }

    /// Track new surface dimensions. Particles keep their positions.
    pub fn resize(&mut self, bounds: SurfaceSize) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> SurfaceSize {
        self.bounds
    }

    pub fn config(&self) -> &AmbientConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn update(&mut self) {
        let bounds = self.bounds;
        for particle in &mut self.particles {
            particle.step(bounds);
        }
    }

    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) -> FrameReport {
        let mut report = FrameReport::default();

        for particle in &self.particles {
            surface.fill_circle(particle.position, particle.radius, particle.color(), None);
            report.circles += 1;
        }

        let threshold = self.config.link_distance;
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = a.position.distance(b.position);
                if distance >= threshold {
                    continue;
                }
                let alpha = link_opacity(distance, threshold, self.config.link_opacity);
                surface.stroke_line(
                    a.position,
                    b.position,
                    Stroke {
                        width: self.config.link_width,
                        color: self.config.link_color.with_alpha(alpha),
                        glow: None,
                    },
                );
                report.lines += 1;
            }
        }

        report
    }

    /// One full frame: clear, update, draw.
    pub fn tick<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> FrameReport {
        surface.clear();
        self.update();
        self.draw(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DrawList;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still(position: Vec2) -> Particle {
        Particle {
            position,
            velocity: Vec2::ZERO,
            radius: 2.0,
            opacity: 0.5,
            tint: VIOLET,
        }
    }

    fn linked_at(distance: f32) -> AmbientConfig {
        AmbientConfig {
            link_distance: distance,
            ..Default::default()
        }
    }

    #[test]
    fn spawned_particles_respect_config() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = SurfaceSize::new(640.0, 480.0);
        let config = AmbientConfig::default();
        for _ in 0..500 {
            let p = Particle::spawn(bounds, &config, &mut rng);
            assert!(bounds.contains(p.position));
            assert!(p.velocity.x >= -0.3 && p.velocity.x < 0.3);
            assert!(p.velocity.y >= -0.3 && p.velocity.y < 0.3);
            assert!(config.radius.contains(p.radius));
            assert!(config.opacity.contains(p.opacity));
            assert!(p.tint == VIOLET || p.tint == SILVER);
        }
    }

    #[test]
    fn positions_stay_on_surface_over_many_steps() {
        let mut rng = StdRng::seed_from_u64(3);
        let bounds = SurfaceSize::new(300.0, 200.0);
        let config = AmbientConfig {
            drift_speed: 40.0,
            ..Default::default()
        };
        let mut particles: Vec<_> = (0..50)
            .map(|_| Particle::spawn(bounds, &config, &mut rng))
            .collect();

        for _ in 0..2_000 {
            for p in &mut particles {
                p.step(bounds);
                assert!(bounds.contains(p.position), "{:?} left the surface", p.position);
            }
        }
    }

    #[test]
    fn crossing_an_edge_teleports_instead_of_reflecting() {
        let bounds = SurfaceSize::new(100.0, 100.0);
        let mut right = Particle {
            velocity: Vec2::new(0.3, 0.0),
            ..still(Vec2::new(99.9, 50.0))
        };
        right.step(bounds);
        assert_eq!(right.position.x, 0.0);
        assert_eq!(right.velocity.x, 0.3);

        let mut top = Particle {
            velocity: Vec2::new(0.0, -0.3),
            ..still(Vec2::new(50.0, 0.1))
        };
        top.step(bounds);
        assert!(top.position.y > 99.9 && top.position.y < 100.0);
        assert_eq!(top.velocity.y, -0.3);
    }

    #[test]
    fn link_opacity_boundaries() {
        assert_eq!(link_opacity(100.0, 100.0, 0.15), 0.0);
        assert_eq!(link_opacity(150.0, 100.0, 0.15), 0.0);
        assert_eq!(link_opacity(0.0, 100.0, 0.15), 0.15);
        assert!((link_opacity(25.0, 100.0, 0.2) - 0.15).abs() < 1e-6);
    }

    #[test]
    fn pair_exactly_at_threshold_is_not_linked() {
        let bounds = SurfaceSize::new(500.0, 500.0);
        let mut field = AmbientField::with_particles(
            bounds,
            linked_at(100.0),
            vec![still(Vec2::new(100.0, 100.0)), still(Vec2::new(200.0, 100.0))],
        );
        let mut list = DrawList::new();
        let report = field.tick(&mut list);
        assert_eq!(report.lines, 0);
        assert_eq!(list.lines().count(), 0);
    }

    #[test]
    fn two_still_particles_fifty_apart_share_one_half_strength_link() {
        let bounds = SurfaceSize::new(500.0, 500.0);
        let config = linked_at(100.0);
        let k = config.link_opacity;
        let mut field = AmbientField::with_particles(
            bounds,
            config,
            vec![still(Vec2::new(200.0, 200.0)), still(Vec2::new(230.0, 240.0))],
        );

        let mut list = DrawList::new();
        let report = field.tick(&mut list);

        assert_eq!(list.clears(), 1);
        assert_eq!(report.circles, 2);
        let lines: Vec<_> = list.lines().collect();
        assert_eq!(lines.len(), 1);
        let (from, to, stroke) = lines[0];
        assert_eq!(from, Vec2::new(200.0, 200.0));
        assert_eq!(to, Vec2::new(230.0, 240.0));
        assert!((stroke.color.a - 0.5 * k).abs() < 1e-6);
        assert_eq!(stroke.width, DEFAULT_LINK_WIDTH);
    }

    #[test]
    fn every_close_pair_is_linked_once() {
        let bounds = SurfaceSize::new(500.0, 500.0);
        let mut field = AmbientField::with_particles(
            bounds,
            linked_at(100.0),
            vec![
                still(Vec2::new(10.0, 10.0)),
                still(Vec2::new(20.0, 10.0)),
                still(Vec2::new(30.0, 10.0)),
                still(Vec2::new(400.0, 400.0)),
            ],
        );
        let mut list = DrawList::new();
        assert_eq!(field.tick(&mut list).lines, 3);
    }

    #[test]
    fn resize_keeps_particle_positions() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = AmbientField::start(
            Some(SurfaceSize::new(800.0, 600.0)),
            AmbientConfig::default(),
            &mut rng,
        )
        .expect("surface present");
        let before: Vec<_> = field.particles().iter().map(|p| p.position).collect();

        field.resize(SurfaceSize::new(200.0, 100.0));

        let after: Vec<_> = field.particles().iter().map(|p| p.position).collect();
        assert_eq!(before, after);
        assert_eq!(field.bounds(), SurfaceSize::new(200.0, 100.0));

        // The next update pulls stragglers back inside the new bounds.
        field.update();
        assert!(field.particles().iter().all(|p| field.bounds().contains(p.position)));
    }

    #[test]
    fn start_without_surface_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(AmbientField::start(None, AmbientConfig::default(), &mut rng).is_none());
    }

    #[test]
    fn start_fills_the_pool() {
        let mut rng = StdRng::seed_from_u64(0);
        let field = AmbientField::start(
            Some(SurfaceSize::new(100.0, 100.0)),
            AmbientConfig::default(),
            &mut rng,
        )
        .expect("surface present");
        assert_eq!(field.particles().len(), DEFAULT_PARTICLE_COUNT);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(AmbientConfig::default().validate().is_ok());
        assert!(linked_at(0.0).validate().is_err());
        let bad_share = AmbientConfig {
            primary_share: 1.5,
            ..Default::default()
        };
        assert!(bad_share.validate().is_err());
    }
}
