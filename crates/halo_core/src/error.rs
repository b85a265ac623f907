use thiserror::Error;

/// Errors raised when validating field configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name}: range [{min}, {max}) is reversed or not finite")]
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must lie within [{min}, {max}], got {value}")]
    OutOfBounds {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{name} must be at least 1")]
    EmptyPool { name: &'static str },

    #[error("ring {index}: {source}")]
    Ring {
        index: usize,
        #[source]
        source: Box<ConfigError>,
    },
}

pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

pub(crate) fn ensure_within(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfBounds {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(ensure_positive("x", f32::NAN).is_err());
        assert!(ensure_within("x", f32::INFINITY, 0.0, f32::MAX).is_err());
        assert!(ensure_within("x", 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn ring_errors_name_the_ring() {
        let err = ConfigError::Ring {
            index: 2,
            source: Box::new(ConfigError::EmptyPool {
                name: "ring.segments",
            }),
        };
        assert_eq!(err.to_string(), "ring 2: ring.segments must be at least 1");
    }
}
