//! Pause-aware simulation clock.
//!
//! `sim_time` is the single time source every actor and light update reads
//! for a frame. While paused it stops accumulating, but the previous frame
//! timestamp keeps advancing so resuming never produces a time jump.

/// Monotonic simulation time accumulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    sim_time: f64,
    prev_time: f64,
}

impl SimClock {
    /// Create a clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock to `frame_time` (seconds since startup).
    ///
    /// If not paused, the elapsed delta is added to `sim_time`. The previous
    /// timestamp is updated unconditionally so a pause/resume cycle does not
    /// replay the paused interval.
    pub fn advance(&mut self, frame_time: f64, paused: bool) {
        let dt = frame_time - self.prev_time;
        if !paused {
            self.sim_time += dt;
        }
        self.prev_time = frame_time;
    }

    /// Accumulated simulation time in seconds.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Simulation time narrowed for GPU uniforms and actor math.
    pub fn sim_time_f32(&self) -> f32 {
        self.sim_time as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advances_while_running() {
        let mut clock = SimClock::new();
        clock.advance(0.016, false);
        clock.advance(0.032, false);
        assert!((clock.sim_time() - 0.032).abs() < 1e-12);
    }

    #[test]
    fn test_pause_freezes_sim_time() {
        let mut clock = SimClock::new();
        clock.advance(1.0, false);
        for frame in 2..10 {
            clock.advance(frame as f64, true);
        }
        assert!((clock.sim_time() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_time_jump_on_resume() {
        let mut clock = SimClock::new();
        clock.advance(1.0, false);
        // Five seconds pass while paused.
        clock.advance(6.0, true);
        // First running frame after resume only adds its own delta.
        clock.advance(6.016, false);
        assert!((clock.sim_time() - 1.016).abs() < 1e-9);
    }

    #[test]
    fn test_toggle_pause_twice_preserves_progression() {
        let mut running = SimClock::new();
        let mut toggled = SimClock::new();
        running.advance(0.5, false);
        toggled.advance(0.5, false);
        // Pause and immediately resume over two frames.
        toggled.advance(0.6, true);
        toggled.advance(0.7, false);
        running.advance(0.6, false);
        running.advance(0.7, false);
        // The toggled clock lost exactly the paused interval, nothing more.
        assert!((running.sim_time() - toggled.sim_time() - 0.1).abs() < 1e-12);
    }
}
