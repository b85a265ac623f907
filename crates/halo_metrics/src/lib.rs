//! Halo Metrics - frame timing and per-field frame statistics
//!
//! Everything here compiles away without the `metrics` feature.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use halo_metrics::{FieldStats, FrameSample, FrameTimer};
//!
//! let mut timer = FrameTimer::new(120);
//! let mut stats = FieldStats::new(120);
//! timer.begin();
//! // ... update and draw a field ...
//! stats.record(FrameSample { circles: 210, lines: 0, arcs: 0, respawns: 1 });
//! timer.end();
//! println!("{:.1} fps, {:.1} circles/frame", timer.fps(), stats.mean().circles);
//! ```

#[cfg(feature = "metrics")]
mod field_stats;
#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod rolling;

#[cfg(feature = "metrics")]
pub use field_stats::FieldStats;
#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use rolling::RollingWindow;

/// Counts one field produced in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSample {
    pub circles: usize,
    pub lines: usize,
    pub arcs: usize,
    pub respawns: usize,
}

/// Averages over the sampled window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameAverages {
    pub circles: f64,
    pub lines: f64,
    pub arcs: f64,
    pub respawns: f64,
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn frames(&self) -> u64 { 0 }
    pub fn fps(&self) -> f64 { 0.0 }
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn frame_time_range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
}

#[cfg(not(feature = "metrics"))]
pub struct FieldStats;

#[cfg(not(feature = "metrics"))]
impl FieldStats {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn record(&mut self, _sample: FrameSample) {}
    pub fn total_respawns(&self) -> u64 { 0 }
    pub fn mean(&self) -> FrameAverages { FrameAverages::default() }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_compiles_with_or_without_metrics() {
        let mut timer = super::FrameTimer::new(60);
        timer.begin();
        timer.end();
        let mut stats = super::FieldStats::new(60);
        stats.record(super::FrameSample::default());
        let _ = stats.mean();
    }
}
