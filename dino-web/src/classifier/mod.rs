//! Classifier module - hand landmarks to discrete jump/duck/neutral poses
//!
//! Re-exports only. All logic in submodules.

mod calibration;
mod detector;
mod landmarks;
mod motion;
mod pose;
mod stats;
mod status;

pub use calibration::CalibrationTimer;
pub use detector::PoseClassifier;
pub use landmarks::{HandFrame, HandLandmark, HAND_SKELETON, LANDMARK_COUNT, MIDDLE_TIP, WRIST};
pub use motion::{frame_difference, MotionDetector};
pub use pose::{Pose, PoseState, DUCK_THRESHOLD, JUMP_THRESHOLD, POSES};
pub use stats::DetectionStats;
pub use status::DetectorStatus;
