//! Calibration gate
//!
//! `arm()` starts a fixed delay; the first `poll()` at or after the deadline
//! reports expiry once. The calibrated flag itself lives in `PoseState`.

pub struct CalibrationTimer {
    delay_ms: f64,
    deadline_ms: Option<f64>,
}

impl CalibrationTimer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            deadline_ms: None,
        }
    }

    pub fn arm(&mut self, now_ms: f64) {
        self.deadline_ms = Some(now_ms + self.delay_ms);
    }

    /// Returns true exactly once per armed delay, when it expires
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    pub fn reset(&mut self) {
        self.deadline_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut timer = CalibrationTimer::new(3000.0);
        timer.arm(1000.0);
        assert!(timer.is_pending());
        assert!(!timer.poll(3999.0));
        assert!(timer.poll(4000.0));
        assert!(!timer.is_pending());
        assert!(!timer.poll(5000.0));
    }

    #[test]
    fn test_rearm_restarts_delay() {
        let mut timer = CalibrationTimer::new(3000.0);
        timer.arm(0.0);
        timer.poll(3000.0);
        timer.arm(10_000.0);
        assert!(!timer.poll(12_000.0));
        assert!(timer.poll(13_000.0));
    }

    #[test]
    fn test_reset_cancels_pending() {
        let mut timer = CalibrationTimer::new(3000.0);
        timer.arm(0.0);
        timer.reset();
        assert!(!timer.is_pending());
        assert!(!timer.poll(10_000.0));
    }
}
