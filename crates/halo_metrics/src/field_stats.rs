//! Per-field frame statistics

use super::rolling::RollingWindow;
use super::{FrameAverages, FrameSample};

/// Rolling per-frame counts for one field, plus a lifetime respawn total.
pub struct FieldStats {
    circles: RollingWindow,
    lines: RollingWindow,
    arcs: RollingWindow,
    respawns: RollingWindow,
    total_respawns: u64,
}

impl FieldStats {
    pub fn new(capacity: usize) -> Self {
        Self {
            circles: RollingWindow::new(capacity),
            lines: RollingWindow::new(capacity),
            arcs: RollingWindow::new(capacity),
            respawns: RollingWindow::new(capacity),
            total_respawns: 0,
        }
    }

    pub fn record(&mut self, sample: FrameSample) {
        self.circles.push(sample.circles as f64);
        self.lines.push(sample.lines as f64);
        self.arcs.push(sample.arcs as f64);
        self.respawns.push(sample.respawns as f64);
        self.total_respawns += sample.respawns as u64;
    }

    pub fn total_respawns(&self) -> u64 {
        self.total_respawns
    }

    pub fn mean(&self) -> FrameAverages {
        FrameAverages {
            circles: self.circles.mean(),
            lines: self.lines.mean(),
            arcs: self.arcs.mean(),
            respawns: self.respawns.mean(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_track_recent_frames() {
        let mut stats = FieldStats::new(2);
        stats.record(FrameSample {
            circles: 100,
            lines: 40,
            arcs: 0,
            respawns: 1,
        });
        stats.record(FrameSample {
            circles: 100,
            lines: 20,
            arcs: 0,
            respawns: 0,
        });
        stats.record(FrameSample {
            circles: 100,
            lines: 10,
            arcs: 0,
            respawns: 3,
        });

        let mean = stats.mean();
        assert_eq!(mean.circles, 100.0);
        assert_eq!(mean.lines, 15.0);
        assert_eq!(mean.respawns, 1.5);
        assert_eq!(stats.total_respawns(), 4);
    }
}
