//! The loop clock: explicit pause/resume state and loop-normalized time.

/// Accumulates animation time in milliseconds while running.
///
/// Pausing freezes the accumulator without losing phase; resuming picks up
/// exactly where the animation left off. Loop-normalized time wraps every
/// `duration_ms`, so a full loop closes seamlessly.
#[derive(Debug, Clone)]
pub struct LoopClock {
    time_ms: f64,
    running: bool,
}

impl Default for LoopClock {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopClock {
    /// A running clock at time zero.
    pub fn new() -> Self {
        Self {
            time_ms: 0.0,
            running: true,
        }
    }

    /// Advance by a frame delta. No-op while paused.
    pub fn advance(&mut self, dt_ms: f64) {
        if self.running {
            self.time_ms += dt_ms;
        }
    }

    /// Toggle between running and paused.
    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Whether the clock is currently advancing.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Absolute accumulated time in milliseconds (not loop-wrapped).
    ///
    /// The ambient scene rotation runs off this so it never snaps at the
    /// loop boundary.
    pub fn time_ms(&self) -> f64 {
        self.time_ms
    }

    /// Loop-normalized time in [0, 1): `(time mod duration) / duration`.
    pub fn loop_time(&self, duration_ms: f64) -> f32 {
        ((self.time_ms % duration_ms) / duration_ms) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOP_MS: f64 = 10_000.0;

    #[test]
    fn advances_while_running() {
        let mut clock = LoopClock::new();
        clock.advance(16.0);
        clock.advance(16.0);
        assert_eq!(clock.time_ms(), 32.0);
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let mut clock = LoopClock::new();
        clock.advance(500.0);
        clock.toggle();
        assert!(!clock.is_running());
        clock.advance(1000.0);
        assert_eq!(clock.time_ms(), 500.0);
        clock.toggle();
        clock.advance(250.0);
        assert_eq!(clock.time_ms(), 750.0);
    }

    #[test]
    fn loop_time_is_normalized() {
        let mut clock = LoopClock::new();
        clock.advance(2_500.0);
        assert!((clock.loop_time(LOOP_MS) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn loop_closes_at_exact_duration() {
        let mut clock = LoopClock::new();
        clock.advance(LOOP_MS);
        assert_eq!(clock.loop_time(LOOP_MS), 0.0);
    }

    #[test]
    fn loop_time_wraps_but_absolute_time_does_not() {
        let mut clock = LoopClock::new();
        clock.advance(23_000.0);
        assert!((clock.loop_time(LOOP_MS) - 0.3).abs() < 1e-9);
        assert_eq!(clock.time_ms(), 23_000.0);
    }

    #[test]
    fn loop_time_stays_below_one() {
        let mut clock = LoopClock::new();
        for _ in 0..10_000 {
            clock.advance(16.7);
            let t = clock.loop_time(LOOP_MS);
            assert!((0.0..1.0).contains(&t));
        }
    }
}
