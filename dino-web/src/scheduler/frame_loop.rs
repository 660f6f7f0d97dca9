//! One self-scheduling animation loop
//!
//! The host calls `advance()` with the display-refresh timestamp; the loop
//! answers with the delta to simulate, or `None` when it should not run.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
    Paused,
}

#[derive(Clone, Debug)]
pub struct FrameLoop {
    state: LoopState,
    last_tick_ms: Option<f64>,
    max_delta_ms: f64,
}

impl FrameLoop {
    pub fn new(max_delta_ms: f64) -> Self {
        Self {
            state: LoopState::Stopped,
            last_tick_ms: None,
            max_delta_ms,
        }
    }

    pub fn start(&mut self) {
        self.state = LoopState::Running;
        self.last_tick_ms = None;
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
        self.last_tick_ms = None;
    }

    pub fn pause(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Paused;
        }
    }

    /// Resume a paused loop. The time spent paused is dropped.
    pub fn resume(&mut self) {
        if self.state == LoopState::Paused {
            self.state = LoopState::Running;
            self.last_tick_ms = None;
        }
    }

    /// Delta in ms since the previous tick, clamped to `[0, max_delta_ms]`.
    /// The first tick after start or resume yields 0.
    pub fn advance(&mut self, now_ms: f64) -> Option<f64> {
        if self.state != LoopState::Running {
            return None;
        }
        let delta = match self.last_tick_ms {
            Some(last) => (now_ms - last).clamp(0.0, self.max_delta_ms),
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);
        Some(delta)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_loop_yields_nothing() {
        let mut fl = FrameLoop::new(250.0);
        assert_eq!(fl.advance(100.0), None);
        fl.start();
        fl.stop();
        assert_eq!(fl.advance(200.0), None);
    }

    #[test]
    fn test_deltas_are_clamped() {
        let mut fl = FrameLoop::new(250.0);
        fl.start();
        assert_eq!(fl.advance(1000.0), Some(0.0));
        assert_eq!(fl.advance(1016.0), Some(16.0));
        assert_eq!(fl.advance(5000.0), Some(250.0));
        // Clock going backwards
        assert_eq!(fl.advance(4000.0), Some(0.0));
    }

    #[test]
    fn test_pause_drops_elapsed_time() {
        let mut fl = FrameLoop::new(250.0);
        fl.start();
        fl.advance(0.0);
        fl.advance(16.0);
        fl.pause();
        assert_eq!(fl.advance(100.0), None);
        assert_eq!(fl.state(), LoopState::Paused);
        fl.resume();
        assert_eq!(fl.advance(60_000.0), Some(0.0));
        assert_eq!(fl.advance(60_016.0), Some(16.0));
    }

    #[test]
    fn test_pause_and_resume_are_state_guarded() {
        let mut fl = FrameLoop::new(250.0);
        fl.pause();
        assert_eq!(fl.state(), LoopState::Stopped);
        fl.resume();
        assert_eq!(fl.state(), LoopState::Stopped);
        fl.start();
        fl.resume();
        assert!(fl.is_running());
    }
}
