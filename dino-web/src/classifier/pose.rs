//! Discrete hand poses and the height thresholds that produce them

/// Normalized hand heights above this line (smaller y) classify as a jump
pub const JUMP_THRESHOLD: f32 = 0.3;

/// Normalized hand heights below this line (larger y) classify as a duck
pub const DUCK_THRESHOLD: f32 = 0.7;

/// Pose labels, in the order the fallback detector picks from
pub const POSES: [Pose; 3] = [Pose::Jump, Pose::Duck, Pose::Neutral];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose {
    Jump,
    Duck,
    Neutral,
}

impl Pose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pose::Jump => "jump",
            Pose::Duck => "duck",
            Pose::Neutral => "neutral",
        }
    }

    /// Classify a normalized hand height (0 = top of frame, 1 = bottom)
    pub fn from_hand_height(y: f32) -> Self {
        if y < JUMP_THRESHOLD {
            Pose::Jump
        } else if y > DUCK_THRESHOLD {
            Pose::Duck
        } else {
            Pose::Neutral
        }
    }
}

/// Classifier output read by the control bridge and the overlay
#[derive(Clone, Debug, PartialEq)]
pub struct PoseState {
    /// Last pose that fired a transition; `None` until the first one
    pub current_pose: Option<Pose>,
    /// Last pose classified from a frame, calibrated or not
    pub display_pose: Pose,
    pub calibrated: bool,
    pub hand_detected: bool,
    /// Wrist height divided by frame height, clamped to [0, 1]
    pub hand_y_normalized: f32,
}

impl Default for PoseState {
    fn default() -> Self {
        Self {
            current_pose: None,
            display_pose: Pose::Neutral,
            calibrated: false,
            hand_detected: false,
            hand_y_normalized: 0.5,
        }
    }
}
