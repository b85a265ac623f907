//! Frame timing

use super::rolling::RollingWindow;
use std::time::Instant;

/// Rolling frame-time tracker, in milliseconds.
pub struct FrameTimer {
    frame_start: Instant,
    frame_ms: RollingWindow,
    frames: u64,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            frame_start: Instant::now(),
            frame_ms: RollingWindow::new(capacity),
            frames: 0,
        }
    }

    pub fn begin(&mut self) {
        self.frame_start = Instant::now();
    }

    pub fn end(&mut self) {
        self.record_ms(self.frame_start.elapsed().as_secs_f64() * 1000.0);
    }

    fn record_ms(&mut self, ms: f64) {
        self.frame_ms.push(ms);
        self.frames += 1;
    }

    /// Frames measured since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn fps(&self) -> f64 {
        let avg = self.frame_ms.mean();
        if avg > 0.0 {
            1000.0 / avg
        } else {
            0.0
        }
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_ms.mean()
    }

    pub fn frame_time_range_ms(&self) -> (f64, f64) {
        self.frame_ms.range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_from_mean_frame_time() {
        let mut timer = FrameTimer::new(4);
        assert_eq!(timer.fps(), 0.0);

        timer.record_ms(10.0);
        timer.record_ms(30.0);
        assert_eq!(timer.frames(), 2);
        assert_eq!(timer.frame_time_ms(), 20.0);
        assert_eq!(timer.fps(), 50.0);
        assert_eq!(timer.frame_time_range_ms(), (10.0, 30.0));
    }
}
