//! # Animation Clock
//!
//! A single normalised progress value shared by every effect. Application logic polls it
//! (for example to switch depth testing off part way through a fade) and the render pass
//! uploads it to the shaders each frame.
//!
//! ```text
//!            start / restart           pause
//!  Stopped ------------------> Running ------> Paused
//!     ^                          |  ^            |
//!     |          stop            |  +------------+
//!     +--------------------------+     resume / start
//! ```

/// Default progress gained per elapsed millisecond: one second per animation
pub const DEFAULT_RATE_PER_MS: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Time-driven progress in `[0, 1]`
#[derive(Debug, Clone)]
pub struct AnimationClock {
    state: ClockState,
    progress: f32,
    rate: f32,
    elapsed_ms: f64,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_PER_MS)
    }
}

impl AnimationClock {
    /// Creates a stopped clock advancing `rate` per millisecond while running
    pub fn new(rate: f32) -> Self {
        Self {
            state: ClockState::Stopped,
            progress: 0.0,
            rate,
            elapsed_ms: 0.0,
        }
    }

    /// Stopped starts from zero, Paused continues where it left off, Running is unchanged
    pub fn start(&mut self) {
        match self.state {
            ClockState::Stopped => {
                self.progress = 0.0;
                self.state = ClockState::Running;
            }
            ClockState::Paused => self.state = ClockState::Running,
            ClockState::Running => {}
        }
    }

    /// Runs from zero whatever the current state
    pub fn restart(&mut self) {
        self.progress = 0.0;
        self.state = ClockState::Running;
    }

    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
        }
    }

    /// Running and Paused swap; a stopped clock stays stopped
    pub fn toggle_pause(&mut self) {
        match self.state {
            ClockState::Running => self.state = ClockState::Paused,
            ClockState::Paused => self.state = ClockState::Running,
            ClockState::Stopped => {}
        }
    }

    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.progress = 0.0;
    }

    /// Advances progress by `elapsed_ms * rate` while running, holding at 1
    pub fn advance(&mut self, elapsed_ms: f32) {
        if self.state != ClockState::Running {
            return;
        }
        let elapsed_ms = elapsed_ms.max(0.0);
        self.elapsed_ms += f64::from(elapsed_ms);
        self.progress = (self.progress + elapsed_ms * self.rate).clamp(0.0, 1.0);
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Total milliseconds spent running since creation
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_start_advance_stop_scenario() {
        let mut clock = AnimationClock::new(0.001);
        clock.start();
        assert_eq!(clock.state(), ClockState::Running);
        assert_eq!(clock.progress(), 0.0);

        clock.advance(500.0);
        assert_relative_eq!(clock.progress(), 0.5, epsilon = 1e-6);

        clock.stop();
        assert_eq!(clock.progress(), 0.0);
        assert_eq!(clock.state(), ClockState::Stopped);
    }

    #[test]
    fn test_progress_monotonic_and_bounded() {
        let mut clock = AnimationClock::default();
        clock.start();
        let steps = [16.6, 0.0, 33.3, 250.0, 7.0, 900.0, 1.0, 5000.0, 16.0];
        let mut previous = clock.progress();
        for ms in steps {
            clock.advance(ms);
            let p = clock.progress();
            assert!(p >= previous, "progress went backwards: {previous} -> {p}");
            assert!((0.0..=1.0).contains(&p));
            previous = p;
        }
        assert_eq!(clock.progress(), 1.0);
    }

    #[test]
    fn test_progress_holds_at_one_until_restart() {
        let mut clock = AnimationClock::default();
        clock.start();
        clock.advance(2000.0);
        clock.advance(2000.0);
        assert_eq!(clock.progress(), 1.0);
        assert!(clock.is_running());

        clock.restart();
        assert_eq!(clock.progress(), 0.0);
        assert!(clock.is_running());
    }

    #[test]
    fn test_pause_resume_preserves_progress() {
        let mut clock = AnimationClock::default();
        clock.start();
        clock.advance(300.0);
        let before = clock.progress();

        clock.pause();
        clock.advance(400.0);
        assert_eq!(clock.progress(), before);
        clock.resume();
        assert_eq!(clock.progress(), before);
        assert_eq!(clock.state(), ClockState::Running);

        clock.advance(100.0);
        assert_relative_eq!(clock.progress(), 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_start_from_paused_keeps_progress() {
        let mut clock = AnimationClock::default();
        clock.start();
        clock.advance(200.0);
        clock.pause();
        clock.start();
        assert!(clock.is_running());
        assert_relative_eq!(clock.progress(), 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_toggle_pause_ignores_stopped_clock() {
        let mut clock = AnimationClock::default();
        clock.toggle_pause();
        assert_eq!(clock.state(), ClockState::Stopped);

        clock.start();
        clock.toggle_pause();
        assert_eq!(clock.state(), ClockState::Paused);
        clock.toggle_pause();
        assert_eq!(clock.state(), ClockState::Running);
    }

    #[test]
    fn test_elapsed_only_accumulates_while_running() {
        let mut clock = AnimationClock::default();
        clock.advance(100.0);
        clock.start();
        clock.advance(40.0);
        clock.pause();
        clock.advance(1000.0);
        clock.resume();
        clock.advance(10.0);
        assert_eq!(clock.elapsed_ms(), 50.0);
    }
}
