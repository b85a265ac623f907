//! Halo Services Layer
//!
//! Host-side services for the runtime: settings files and their validation.

pub mod settings;

pub use settings::{EffectToggles, Settings, SettingsError, WindowSettings};
