//! Radial infall field ("black hole")
//!
//! Two pools share one surface: twinkling stars fixed in place, and
//! particles that spiral toward the surface center and respawn at the rim
//! when they get too close. The center is recomputed from the surface size
//! every frame, so a resize takes effect without restarting the field.
//!
//! Stars keep their absolute positions across a resize and may end up off
//! the surface after it shrinks.

use crate::error::{ensure_positive, ensure_within, ConfigError};
use crate::math::{polar, random_angle, Span};
use crate::ring::{Ring, RingConfig};
use crate::surface::{DrawSurface, Glow, Rgba, SurfaceSize};
use crate::FrameReport;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STAR_COUNT: usize = 150;
pub const DEFAULT_PARTICLE_COUNT: usize = 60;
pub const RESPAWN_DISTANCE: f32 = 30.0;
pub const FADE_DISTANCE: f32 = 200.0;
pub const SPAWN_DISTANCE: Span = Span::new(300.0, 700.0);
pub const MAX_PARTICLE_ALPHA: f32 = 0.8;

pub const STAR_COLOR: Rgba = Rgba::WHITE;
pub const INFALL_COLOR: Rgba = Rgba::rgb(200, 180, 255);
pub const INFALL_GLOW: Rgba = Rgba::new(157, 78, 221, 0.8);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialConfig {
    pub star_count: usize,
    pub star_size: Span,
    pub star_opacity: Span,
    /// Radians of twinkle phase per tick.
    pub twinkle_speed: Span,
    pub star_color: Rgba,
    pub star_glow: Glow,

    pub particle_count: usize,
    /// Distance from the center at which particles (re)appear.
    pub spawn_distance: Span,
    /// Particles closer than this respawn.
    pub respawn_distance: f32,
    /// Particles closer than this fade out linearly.
    pub fade_distance: f32,
    pub particle_size: Span,
    pub particle_opacity: Span,
    /// Radians per tick.
    pub spiral_speed: Span,
    /// Pixels per tick.
    pub fall_speed: Span,
    pub max_alpha: f32,
    /// Drawn radius is `size * particle_scale`.
    pub particle_scale: f32,
    pub particle_color: Rgba,
    pub particle_glow: Glow,

    /// Update and draw `rings` every frame, beneath stars and particles.
    pub drive_rings: bool,
    pub rings: Vec<RingConfig>,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            star_count: DEFAULT_STAR_COUNT,
            star_size: Span::new(1.0, 3.0),
            star_opacity: Span::new(0.6, 1.0),
            twinkle_speed: Span::new(0.01, 0.03),
            star_color: STAR_COLOR,
            star_glow: Glow {
                blur: 3.0,
                color: Rgba::new(255, 255, 255, 0.8),
            },

            particle_count: DEFAULT_PARTICLE_COUNT,
            spawn_distance: SPAWN_DISTANCE,
            respawn_distance: RESPAWN_DISTANCE,
            fade_distance: FADE_DISTANCE,
            particle_size: Span::new(1.5, 2.5),
            particle_opacity: Span::new(0.9, 1.0),
            spiral_speed: Span::new(0.008, 0.014),
            fall_speed: Span::new(0.6, 1.1),
            max_alpha: MAX_PARTICLE_ALPHA,
            particle_scale: 1.5,
            particle_color: INFALL_COLOR,
            particle_glow: Glow {
                blur: 10.0,
                color: INFALL_GLOW,
            },

            drive_rings: false,
            rings: Vec::new(),
        }
    }
}

impl RadialConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.star_size.validate("radial.star_size")?;
        self.star_opacity.validate("radial.star_opacity")?;
        self.twinkle_speed.validate("radial.twinkle_speed")?;
        ensure_positive("radial.twinkle_speed.min", self.twinkle_speed.min)?;

        self.spawn_distance.validate("radial.spawn_distance")?;
        ensure_within("radial.respawn_distance", self.respawn_distance, 0.0, f32::MAX)?;
        ensure_within(
            "radial.spawn_distance.min",
            self.spawn_distance.min,
            self.respawn_distance,
            f32::MAX,
        )?;
        ensure_positive("radial.fade_distance", self.fade_distance)?;
        self.particle_size.validate("radial.particle_size")?;
        self.particle_opacity.validate("radial.particle_opacity")?;
        self.spiral_speed.validate("radial.spiral_speed")?;
        self.fall_speed.validate("radial.fall_speed")?;
        // Distance must strictly shrink every tick.
        ensure_positive("radial.fall_speed.min", self.fall_speed.min)?;
        ensure_within("radial.max_alpha", self.max_alpha, 0.0, 1.0)?;
        ensure_positive("radial.particle_scale", self.particle_scale)?;

        for (index, ring) in self.rings.iter().enumerate() {
            ring.validate().map_err(|source| ConfigError::Ring {
                index,
                source: Box::new(source),
            })?;
        }
        Ok(())
    }
}

/// Twinkling background point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec2,
    pub size: f32,
    pub base_opacity: f32,
    pub twinkle_speed: f32,
    pub phase: f32,
}

impl Star {
    pub fn spawn<R: Rng + ?Sized>(bounds: SurfaceSize, config: &RadialConfig, rng: &mut R) -> Self {
        Self {
            position: Vec2::new(
                Span::new(0.0, bounds.width).sample(rng),
                Span::new(0.0, bounds.height).sample(rng),
            ),
            size: config.star_size.sample(rng),
            base_opacity: config.star_opacity.sample(rng),
            twinkle_speed: config.twinkle_speed.sample(rng),
            phase: random_angle(rng),
        }
    }

    pub fn advance(&mut self) {
        self.phase += self.twinkle_speed;
    }

    pub fn opacity(&self) -> f32 {
        twinkle_opacity(self.base_opacity, self.phase)
    }
}

/// Star opacity at `phase`: swings smoothly between half and all of `base`.
pub fn twinkle_opacity(base: f32, phase: f32) -> f32 {
    let twinkle = (phase.sin() + 1.0) / 2.0;
    base * (0.5 + 0.5 * twinkle)
}

/// Alpha of a spiraling particle at `distance` from the center.
pub fn fade_alpha(opacity: f32, distance: f32, fade_distance: f32, max_alpha: f32) -> f32 {
    let fade = (distance / fade_distance).min(1.0);
    opacity * fade * max_alpha
}

/// What one update did to a spiraling particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Falling,
    Respawned,
}

/// Particle falling toward the center along a spiral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParticle {
    pub angle: f32,
    pub distance: f32,
    pub spiral_speed: f32,
    pub fall_speed: f32,
    pub size: f32,
    pub opacity: f32,
    respawned: bool,
}

impl SpiralParticle {
    pub fn spawn<R: Rng + ?Sized>(config: &RadialConfig, rng: &mut R) -> Self {
        let mut particle = Self::at(0.0, config.spawn_distance.min);
        particle.respawn(config, rng);
        particle.respawned = false;
        particle
    }

    /// Particle at a fixed angle and distance with the default speeds.
    pub fn at(angle: f32, distance: f32) -> Self {
        Self {
            angle,
            distance,
            spiral_speed: 0.01,
            fall_speed: 0.8,
            size: 2.0,
            opacity: 1.0,
            respawned: false,
        }
    }

    /// Reinitialize in place somewhere on the outer band.
    pub fn respawn<R: Rng + ?Sized>(&mut self, config: &RadialConfig, rng: &mut R) {
        self.angle = random_angle(rng);
        self.distance = config.spawn_distance.sample(rng);
        self.size = config.particle_size.sample(rng);
        self.opacity = config.particle_opacity.sample(rng);
        self.spiral_speed = config.spiral_speed.sample(rng);
        self.fall_speed = config.fall_speed.sample(rng);
        self.respawned = true;
    }

    pub fn step<R: Rng + ?Sized>(&mut self, config: &RadialConfig, rng: &mut R) -> Motion {
        self.respawned = false;
        self.angle += self.spiral_speed;
        self.distance -= self.fall_speed;

        if self.distance < config.respawn_distance {
            self.respawn(config, rng);
            return Motion::Respawned;
        }
        Motion::Falling
    }

    /// Respawned during the latest update; such particles sit out one draw.
    pub fn is_fresh(&self) -> bool {
        self.respawned
    }

    pub fn position(&self, center: Vec2) -> Vec2 {
        polar(center, self.angle, self.distance)
    }

    pub fn alpha(&self, config: &RadialConfig) -> f32 {
        fade_alpha(self.opacity, self.distance, config.fade_distance, config.max_alpha)
    }
}

/// Running radial field bound to one surface.
#[derive(Debug, Clone)]
pub struct RadialField {
    config: RadialConfig,
    bounds: SurfaceSize,
    center: Vec2,
    stars: Vec<Star>,
    particles: Vec<SpiralParticle>,
    rings: Vec<Ring>,
}

impl RadialField {
    /// Start the field on `target`, sized to the full viewport. Without a
    /// target the field silently stays off.
    pub fn start<R: Rng + ?Sized>(
        target: Option<SurfaceSize>,
        config: RadialConfig,
        rng: &mut R,
    ) -> Option<Self> {
        let Some(bounds) = target else {
            tracing::debug!("radial field: no target surface, skipping");
            return None;
        };

        let stars = (0..config.star_count)
            .map(|_| Star::spawn(bounds, &config, rng))
            .collect();
        let particles = (0..config.particle_count)
            .map(|_| SpiralParticle::spawn(&config, rng))
            .collect();
        let rings = config
            .rings
            .iter()
            .map(|ring| Ring::new(ring.clone(), rng))
            .collect();

        tracing::info!(
            stars = config.star_count,
            particles = config.particle_count,
            rings = config.rings.len(),
            drive_rings = config.drive_rings,
            "radial field started"
        );

        Some(Self::with_pools(bounds, config, stars, particles, rings))
    }

    /// Field with explicit pools.
    pub fn with_pools(
        bounds: SurfaceSize,
        config: RadialConfig,
        stars: Vec<Star>,
        particles: Vec<SpiralParticle>,
        rings: Vec<Ring>,
    ) -> Self {
        Self {
            config,
            bounds,
            center: bounds.center(),
            stars,
            particles,
            rings,
        }
    }

    /// Track new viewport dimensions. The center follows on the next update.
    pub fn resize(&mut self, bounds: SurfaceSize) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> SurfaceSize {
        self.bounds
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn config(&self) -> &RadialConfig {
        &self.config
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn particles(&self) -> &[SpiralParticle] {
        &self.particles
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Advance every entity by one tick. Returns how many particles respawned.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        self.center = self.bounds.center();

        if self.config.drive_rings {
            for ring in &mut self.rings {
                ring.update();
            }
        }

        for star in &mut self.stars {
            star.advance();
        }

        let mut respawns = 0;
        for particle in &mut self.particles {
            if particle.step(&self.config, rng) == Motion::Respawned {
                respawns += 1;
            }
        }
        respawns
    }

    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) -> FrameReport {
        let mut report = FrameReport::default();

        if self.config.drive_rings {
            for ring in &self.rings {
                report += ring.draw(surface, self.center, self.bounds);
            }
        }

        for star in &self.stars {
            surface.fill_circle(
                star.position,
                star.size,
                self.config.star_color.with_alpha(star.opacity()),
                Some(self.config.star_glow),
            );
            report.circles += 1;
        }

        for particle in self.particles.iter().filter(|p| !p.is_fresh()) {
            surface.fill_circle(
                particle.position(self.center),
                particle.size * self.config.particle_scale,
                self.config.particle_color.with_alpha(particle.alpha(&self.config)),
                Some(self.config.particle_glow),
            );
            report.circles += 1;
        }

        report
    }

    /// One full frame: clear, update, draw.
    pub fn tick<S, R>(&mut self, surface: &mut S, rng: &mut R) -> FrameReport
    where
        S: DrawSurface + ?Sized,
        R: Rng + ?Sized,
    {
        surface.clear();
        let respawns = self.update(rng);
        let mut report = self.draw(surface);
        report.respawns = respawns;
        report
    }
}
