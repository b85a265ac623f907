//! Frame clock
//!
//! Fixed 60Hz simulation ticks decoupled from the display refresh rate.
//! The host asks how many ticks are due, updates that many times, then
//! draws once.

use std::time::{Duration, Instant};

/// Fixed simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Most ticks run for a single redraw; a longer stall is dropped.
pub const MAX_CATCH_UP_TICKS: u32 = 5;

/// Tick accumulator driven by wall-clock time.
pub struct FrameClock {
    tick_count: u64,
    accumulated: Duration,
    last_update: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            tick_count: 0,
            accumulated: Duration::ZERO,
            last_update: None,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Ticks due at `now`. The first call always yields one tick so the
    /// first frame is drawn with one update applied.
    pub fn update(&mut self, now: Instant) -> u32 {
        let elapsed = match self.last_update {
            Some(last) => now.saturating_duration_since(last),
            None => TICK_DURATION,
        };
        self.last_update = Some(now);
        self.advance(elapsed)
    }

    /// Feed `elapsed` time and return the number of whole ticks due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;

        let mut ticks = 0;
        while self.accumulated >= TICK_DURATION && ticks < MAX_CATCH_UP_TICKS {
            self.accumulated -= TICK_DURATION;
            ticks += 1;
        }
        if self.accumulated >= TICK_DURATION {
            tracing::debug!(
                dropped_ms = self.accumulated.as_secs_f64() * 1000.0,
                "frame clock fell behind, dropping backlog"
            );
            self.accumulated = Duration::ZERO;
        }

        self.tick_count += u64::from(ticks);
        ticks
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_runs_one_tick() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.update(Instant::now()), 1);
        assert_eq!(clock.tick_count(), 1);
    }

    #[test]
    fn partial_ticks_accumulate() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(TICK_DURATION / 2), 0);
        assert_eq!(clock.advance(TICK_DURATION / 2), 1);
        assert_eq!(clock.advance(TICK_DURATION * 2), 2);
        assert_eq!(clock.tick_count(), 3);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(Duration::from_secs(3)), MAX_CATCH_UP_TICKS);
        // Backlog is dropped, not replayed on the next frame.
        assert_eq!(clock.advance(Duration::ZERO), 0);
    }
}
