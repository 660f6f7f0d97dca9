//! Detector status line shown next to the camera preview

use super::pose::Pose;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectorStatus {
    CameraOff,
    ModelFallback,
    CameraActive,
    CameraUnavailable,
    Calibrating,
    Calibrated,
    PoseDetected(Pose),
    CameraStopped,
}

impl DetectorStatus {
    pub fn text(&self) -> &'static str {
        match self {
            DetectorStatus::CameraOff => "Camera off",
            DetectorStatus::ModelFallback => "Using fallback motion detection",
            DetectorStatus::CameraActive => "Camera active - Show your hand!",
            DetectorStatus::CameraUnavailable => "Camera access denied or not available",
            DetectorStatus::Calibrating => "Calibrating... Put hand in middle position",
            DetectorStatus::Calibrated => "Calibration complete! Move hand up/down to play",
            DetectorStatus::PoseDetected(Pose::Jump) => "JUMP detected!",
            DetectorStatus::PoseDetected(Pose::Duck) => "DUCK detected!",
            DetectorStatus::PoseDetected(Pose::Neutral) => "Running position",
            DetectorStatus::CameraStopped => "Camera stopped",
        }
    }

    /// Badge background colour (CSS hex)
    pub fn color(&self) -> &'static str {
        match self {
            DetectorStatus::CameraUnavailable => "#e17055",
            DetectorStatus::ModelFallback
            | DetectorStatus::Calibrating
            | DetectorStatus::PoseDetected(Pose::Duck) => "#fdcb6e",
            DetectorStatus::Calibrated | DetectorStatus::PoseDetected(Pose::Jump) => "#00b894",
            _ => "#2d4059",
        }
    }
}
