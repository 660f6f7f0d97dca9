//! Detection accuracy counter for the diagnostics overlay

#[derive(Clone, Debug, Default)]
pub struct DetectionStats {
    attempts: u64,
    detections: u64,
}

impl DetectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one detection cycle
    pub fn record(&mut self, hand_found: bool) {
        self.attempts += 1;
        if hand_found {
            self.detections += 1;
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Ratio of cycles that found a hand, 0.0 before the first attempt
    pub fn ratio(&self) -> f32 {
        if self.attempts == 0 {
            0.0
        } else {
            self.detections as f32 / self.attempts as f32
        }
    }

    /// Rounded percentage, capped at 100
    pub fn percent(&self) -> u32 {
        ((self.ratio() * 100.0).round() as u32).min(100)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
