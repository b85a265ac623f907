//! Settings management
//!
//! Settings live in a JSON file. Every field is optional; anything left out
//! keeps its built-in default, so a file only needs the values it changes:
//!
//! ```json
//! { "seed": 7, "ambient": { "link_distance": 100.0 } }
//! ```

use halo_core::ambient::AmbientConfig;
use halo_core::radial::RadialConfig;
use halo_core::{ConfigError, Rgba};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),

    #[error("window size {width}x{height} must be non-zero")]
    EmptyWindow { width: u32, height: u32 },
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
    pub effects: EffectToggles,
    pub ambient: AmbientConfig,
    pub radial: RadialConfig,
    /// Log frame statistics every this many frames; 0 disables.
    pub stats_interval: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
}

/// Which effects get a surface. A disabled effect never starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectToggles {
    pub ambient: bool,
    pub radial: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            seed: None,
            effects: EffectToggles::default(),
            ambient: AmbientConfig::default(),
            radial: RadialConfig::default(),
            stats_interval: 600,
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Halo".to_string(),
            width: 1280,
            height: 720,
            background: Rgba::rgb(10, 10, 12),
        }
    }
}

impl Default for EffectToggles {
    fn default() -> Self {
        Self {
            ambient: true,
            radial: true,
        }
    }
}

impl Settings {
    /// Read, parse and validate a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse and validate settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(SettingsError::EmptyWindow {
                width: self.window.width,
                height: self.window.height,
            });
        }
        self.ambient.validate()?;
        self.radial.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::ring::RingConfig;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_json(
            r#"{
                "seed": 42,
                "ambient": { "link_distance": 100.0, "particle_count": 2 },
                "effects": { "radial": false }
            }"#,
        )
        .expect("valid settings");

        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.ambient.link_distance, 100.0);
        assert_eq!(settings.ambient.particle_count, 2);
        assert_eq!(settings.ambient.link_opacity, AmbientConfig::default().link_opacity);
        assert!(settings.effects.ambient);
        assert!(!settings.effects.radial);
        assert_eq!(settings.radial, RadialConfig::default());
    }

    #[test]
    fn rings_can_be_configured() {
        let settings = Settings::from_json(
            r#"{ "radial": { "drive_rings": true, "rings": [ { "radius": 90.0, "upper_half_only": true } ] } }"#,
        )
        .expect("valid settings");
        assert!(settings.radial.drive_rings);
        assert_eq!(
            settings.radial.rings,
            vec![RingConfig {
                radius: 90.0,
                upper_half_only: true,
                ..Default::default()
            }]
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = Settings::from_json(r#"{ "radial": { "fall_speed": { "min": 0.0, "max": 1.0 } } }"#)
            .expect_err("stalled particles");
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Settings::from_json(r#"{ "window": { "width": 0 } }"#).expect_err("empty window");
        assert!(matches!(err, SettingsError::EmptyWindow { width: 0, .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Settings::from_json("{ seed: ").expect_err("not json");
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn load_reads_files_and_reports_missing_ones() {
        let dir = std::env::temp_dir().join(format!("halo-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("settings.json");
        std::fs::write(&path, r#"{ "stats_interval": 0 }"#).expect("write settings");

        let settings = Settings::load(&path).expect("load settings");
        assert_eq!(settings.stats_interval, 0);

        let missing = dir.join("missing.json");
        assert!(matches!(
            Settings::load(&missing),
            Err(SettingsError::Io { .. })
        ));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn printed_defaults_parse_back() {
        let text = Settings::default().to_json_pretty().expect("serialize");
        assert_eq!(Settings::from_json(&text).expect("parse"), Settings::default());
    }
}
