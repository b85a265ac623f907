//! Math utilities
//!
//! Re-exports glam with the sampling and wrapping helpers the fields share.

pub use glam::*;

use crate::error::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Half-open sampling range `[min, max)`.
///
/// A range with `min == max` is allowed and always yields `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range centred on zero: `[-half_width, half_width)`.
    pub const fn symmetric(half_width: f32) -> Self {
        Self {
            min: -half_width,
            max: half_width,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value < self.max
    }

    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Uniform angle in `[0, 2π)`.
pub fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..TAU)
}

/// Teleports a coordinate to the opposite edge of `[0, extent)` once it
/// leaves that interval. Values already inside are returned untouched.
pub fn wrap_axis(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    if value >= extent {
        0.0
    } else if value < 0.0 {
        just_below(extent)
    } else {
        value
    }
}

/// Largest float strictly below a positive finite `value`.
#[inline]
fn just_below(value: f32) -> f32 {
    f32::from_bits(value.to_bits() - 1)
}

/// Point at `distance` from `center` along `angle` (radians, y down).
#[inline]
pub fn polar(center: Vec2, angle: f32, distance: f32) -> Vec2 {
    center + Vec2::new(angle.cos(), angle.sin()) * distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn span_samples_stay_half_open() {
        let mut rng = StdRng::seed_from_u64(7);
        let span = Span::new(300.0, 700.0);
        for _ in 0..10_000 {
            let v = span.sample(&mut rng);
            assert!(span.contains(v), "{v} escaped {span:?}");
        }
    }

    #[test]
    fn degenerate_span_yields_min() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Span::new(2.0, 2.0).sample(&mut rng), 2.0);
    }

    #[test]
    fn reversed_span_is_rejected() {
        assert!(Span::new(3.0, 1.0).validate("size").is_err());
        assert!(Span::new(f32::NAN, 1.0).validate("size").is_err());
        assert!(Span::symmetric(0.3).validate("drift").is_ok());
    }

    #[test]
    fn wrap_teleports_to_opposite_edge() {
        assert_eq!(wrap_axis(100.2, 100.0), 0.0);
        assert_eq!(wrap_axis(100.0, 100.0), 0.0);
        let wrapped = wrap_axis(-0.2, 100.0);
        assert!(wrapped < 100.0 && wrapped > 99.99);
        assert_eq!(wrap_axis(42.0, 100.0), 42.0);
        assert_eq!(wrap_axis(5.0, 0.0), 0.0);
    }

    #[test]
    fn polar_follows_angle() {
        let p = polar(Vec2::new(10.0, 10.0), 0.0, 5.0);
        assert!((p - Vec2::new(15.0, 10.0)).length() < 1e-5);
        let q = polar(Vec2::ZERO, std::f32::consts::FRAC_PI_2, 2.0);
        assert!((q - Vec2::new(0.0, 2.0)).length() < 1e-5);
    }
}
