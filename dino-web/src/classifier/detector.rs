//! Pose classifier - turns detection cycles into edge-triggered pose transitions
//!
//! Owns the pose state exclusively. Every `process_*` call is one detection
//! cycle and returns `Some(pose)` only when a transition fires, i.e. the
//! classified pose differs from the last fired pose and calibration is done.
//! The caller forwards that pose to the control bridge.

use super::calibration::CalibrationTimer;
use super::landmarks::HandFrame;
use super::motion::MotionDetector;
use super::pose::{Pose, PoseState};
use super::stats::DetectionStats;
use super::status::DetectorStatus;
use crate::config::ClassifierConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DetectionMode {
    /// Landmark model loaded; poses come from the wrist height
    Landmarks,
    /// Model failed to load; poses come from the motion heuristic
    MotionFallback,
}

pub struct PoseClassifier {
    state: PoseState,
    calibration: CalibrationTimer,
    motion: MotionDetector,
    stats: DetectionStats,
    mode: DetectionMode,
    camera_on: bool,
    status: DetectorStatus,
    last_hand: Option<HandFrame>,
    frame_size: (f32, f32),
    /// Completed calibration latches, first one included
    calibrations: u32,
}

impl PoseClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            state: PoseState::default(),
            calibration: CalibrationTimer::new(config.calibration_ms),
            motion: MotionDetector::new(config),
            stats: DetectionStats::new(),
            mode: DetectionMode::Landmarks,
            camera_on: false,
            status: DetectorStatus::CameraOff,
            last_hand: None,
            frame_size: (640.0, 480.0),
            calibrations: 0,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Record whether the landmark model loaded
    pub fn set_model_available(&mut self, available: bool) {
        self.mode = if available {
            DetectionMode::Landmarks
        } else {
            DetectionMode::MotionFallback
        };
        if available {
            log::info!("Hand landmark model loaded");
        } else {
            log::warn!("Hand landmark model unavailable, using fallback motion detection");
            self.status = DetectorStatus::ModelFallback;
        }
    }

    pub fn camera_started(&mut self, frame_width: f32, frame_height: f32) {
        self.camera_on = true;
        self.stats.clear();
        if frame_width > 0.0 && frame_height > 0.0 {
            self.frame_size = (frame_width, frame_height);
        }
        self.status = DetectorStatus::CameraActive;
    }

    /// Track the resolution the landmark coordinates are expressed in
    pub fn resize_frame(&mut self, frame_width: f32, frame_height: f32) {
        if frame_width > 0.0 && frame_height > 0.0 {
            self.frame_size = (frame_width, frame_height);
        }
    }

    /// Camera acquisition failed; the detector stays off
    pub fn camera_failed(&mut self) {
        self.camera_on = false;
        self.status = DetectorStatus::CameraUnavailable;
    }

    /// Stop detection and drop every piece of per-session pose state
    pub fn stop(&mut self) {
        self.camera_on = false;
        self.calibration.reset();
        self.motion.clear();
        self.stats.clear();
        self.last_hand = None;
        self.state = PoseState::default();
        self.status = DetectorStatus::CameraStopped;
    }

    /// Arm the calibration delay. Ignored while the camera is off.
    pub fn calibrate(&mut self, now_ms: f64) -> bool {
        if !self.camera_on {
            log::warn!("Calibration requested with the camera off");
            return false;
        }
        self.calibration.arm(now_ms);
        self.status = DetectorStatus::Calibrating;
        log::info!("Calibration armed for {:.0}ms", self.calibration.delay_ms());
        true
    }

    /// Latch calibration once the delay has elapsed. Returns true on the
    /// cycle that completes it.
    ///
    /// Every latch, re-arms included, resets the fired pose to neutral without
    /// emitting a transition. Callers that drive a game compare
    /// `calibration_count()` across a cycle and stand the player up.
    pub fn poll_calibration(&mut self, now_ms: f64) -> bool {
        if !self.calibration.poll(now_ms) {
            return false;
        }
        self.calibrations += 1;
        self.state.calibrated = true;
        self.state.current_pose = Some(Pose::Neutral);
        self.state.display_pose = Pose::Neutral;
        self.status = DetectorStatus::Calibrated;
        log::info!("Calibration complete");
        true
    }

    // ------------------------------------------------------------------
    // Detection cycles
    // ------------------------------------------------------------------

    /// One landmark detection cycle. `hand` is `None` when no hand was found.
    pub fn process_landmarks(
        &mut self,
        hand: Option<HandFrame>,
        frame_height: f32,
        now_ms: f64,
    ) -> Option<Pose> {
        if !self.camera_on {
            return None;
        }
        self.poll_calibration(now_ms);

        let hand = match hand {
            Some(hand) if frame_height > 0.0 => hand,
            _ => {
                self.stats.record(false);
                self.state.hand_detected = false;
                return None;
            }
        };
        self.stats.record(true);
        self.frame_size.1 = frame_height;

        let hand_y = (hand.wrist().y / frame_height).clamp(0.0, 1.0);
        let pose = Pose::from_hand_height(hand_y);

        self.state.hand_detected = true;
        self.state.hand_y_normalized = hand_y;
        self.state.display_pose = pose;
        self.last_hand = Some(hand);

        self.fire_if_changed(pose)
    }

    /// A detection cycle that threw; counts as "no hand" and the loop goes on
    pub fn detection_failed(&mut self, now_ms: f64) -> Option<Pose> {
        log::warn!("Hand detection cycle failed, treating as no hand");
        self.process_landmarks(None, 0.0, now_ms)
    }

    /// One fallback cycle over a raw RGBA camera frame
    pub fn process_motion(&mut self, rgba: &[u8], width: u32, height: u32, now_ms: f64) -> Option<Pose> {
        if !self.camera_on {
            return None;
        }
        self.poll_calibration(now_ms);
        self.stats.record(false);
        self.state.hand_detected = false;

        // Motion is tracked before calibration too
        let candidate = self.motion.observe(rgba, width, height);
        if !self.state.calibrated {
            return None;
        }

        let pose = candidate?;
        self.state.display_pose = pose;
        self.fire_if_changed(pose)
    }

    fn fire_if_changed(&mut self, pose: Pose) -> Option<Pose> {
        if !self.state.calibrated || self.state.current_pose == Some(pose) {
            return None;
        }
        self.state.current_pose = Some(pose);
        self.status = DetectorStatus::PoseDetected(pose);
        log::debug!("Pose transition: {}", pose.as_str());
        Some(pose)
    }

    // ------------------------------------------------------------------
    // Read-only queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> &PoseState {
        &self.state
    }

    pub fn current_pose(&self) -> Option<Pose> {
        self.state.current_pose
    }

    pub fn is_calibrated(&self) -> bool {
        self.state.calibrated
    }

    pub fn calibration_count(&self) -> u32 {
        self.calibrations
    }

    pub fn is_camera_on(&self) -> bool {
        self.camera_on
    }

    pub fn is_fallback(&self) -> bool {
        self.mode == DetectionMode::MotionFallback
    }

    pub fn status(&self) -> DetectorStatus {
        self.status
    }

    /// Moving-pixel ratio of the last fallback frame
    pub fn motion_level(&self) -> f32 {
        self.motion.last_motion()
    }

    pub fn accuracy_percent(&self) -> u32 {
        self.stats.percent()
    }

    pub fn stats(&self) -> &DetectionStats {
        &self.stats
    }

    /// Most recent detected hand, for the skeleton overlay
    pub fn last_hand(&self) -> Option<&HandFrame> {
        if self.state.hand_detected {
            self.last_hand.as_ref()
        } else {
            None
        }
    }

    pub fn frame_size(&self) -> (f32, f32) {
        self.frame_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::landmarks::{HandLandmark, LANDMARK_COUNT};

    fn hand_at(y: f32) -> Option<HandFrame> {
        Some(HandFrame::new([HandLandmark { x: 320.0, y }; LANDMARK_COUNT]))
    }

    fn calibrated_classifier() -> PoseClassifier {
        let mut classifier = PoseClassifier::new(&ClassifierConfig::default());
        classifier.camera_started(640.0, 480.0);
        classifier.calibrate(0.0);
        assert!(classifier.poll_calibration(3000.0));
        classifier
    }

    #[test]
    fn test_uncalibrated_frames_never_fire() {
        let mut classifier = PoseClassifier::new(&ClassifierConfig::default());
        classifier.camera_started(640.0, 480.0);
        for (i, y) in [10.0, 470.0, 240.0, 5.0, 479.0].iter().enumerate() {
            assert_eq!(classifier.process_landmarks(hand_at(*y), 480.0, i as f64 * 16.0), None);
        }
        // Display state still follows the hand
        assert_eq!(classifier.state().display_pose, Pose::Duck);
        assert_eq!(classifier.current_pose(), None);
    }

    #[test]
    fn test_calibration_resets_pose_to_neutral() {
        let mut classifier = calibrated_classifier();
        assert_eq!(classifier.current_pose(), Some(Pose::Neutral));
        assert_eq!(classifier.status(), DetectorStatus::Calibrated);
        // Hand already in the neutral band: nothing to fire
        assert_eq!(classifier.process_landmarks(hand_at(240.0), 480.0, 3100.0), None);
    }

    #[test]
    fn test_edge_triggered() {
        let mut classifier = calibrated_classifier();
        assert_eq!(classifier.process_landmarks(hand_at(50.0), 480.0, 3100.0), Some(Pose::Jump));
        assert_eq!(classifier.process_landmarks(hand_at(60.0), 480.0, 3116.0), None);
        assert_eq!(classifier.process_landmarks(hand_at(400.0), 480.0, 3132.0), Some(Pose::Duck));
        assert_eq!(classifier.process_landmarks(hand_at(240.0), 480.0, 3148.0), Some(Pose::Neutral));
        assert_eq!(classifier.status(), DetectorStatus::PoseDetected(Pose::Neutral));
    }

    #[test]
    fn test_calibration_completes_inside_detection_cycle() {
        let mut classifier = PoseClassifier::new(&ClassifierConfig::default());
        classifier.camera_started(640.0, 480.0);
        classifier.calibrate(1000.0);
        assert_eq!(classifier.status(), DetectorStatus::Calibrating);
        assert_eq!(classifier.process_landmarks(hand_at(10.0), 480.0, 3999.0), None);
        assert_eq!(classifier.process_landmarks(hand_at(10.0), 480.0, 4000.0), Some(Pose::Jump));
    }

    #[test]
    fn test_missing_hand_and_errors_count_against_accuracy() {
        let mut classifier = calibrated_classifier();
        classifier.process_landmarks(hand_at(240.0), 480.0, 0.0);
        classifier.process_landmarks(None, 480.0, 16.0);
        assert_eq!(classifier.detection_failed(32.0), None);
        classifier.process_landmarks(hand_at(240.0), 480.0, 48.0);
        assert_eq!(classifier.accuracy_percent(), 50);
        assert!(classifier.state().hand_detected);
    }

    #[test]
    fn test_stop_clears_everything() {
        let mut classifier = calibrated_classifier();
        classifier.process_landmarks(hand_at(50.0), 480.0, 3100.0);
        classifier.stop();
        assert!(!classifier.is_camera_on());
        assert!(!classifier.is_calibrated());
        assert_eq!(classifier.current_pose(), None);
        assert_eq!(classifier.status(), DetectorStatus::CameraStopped);
        // Loop is halted: frames are ignored entirely
        assert_eq!(classifier.process_landmarks(hand_at(400.0), 480.0, 3200.0), None);
        assert_eq!(classifier.stats().attempts(), 0);
    }

    #[test]
    fn test_recalibration_resets_pose_and_counts() {
        let mut classifier = calibrated_classifier();
        assert_eq!(classifier.calibration_count(), 1);
        assert_eq!(classifier.process_landmarks(hand_at(420.0), 480.0, 3100.0), Some(Pose::Duck));

        assert!(classifier.calibrate(4000.0));
        assert!(classifier.is_calibrated());
        assert_eq!(classifier.process_landmarks(hand_at(240.0), 480.0, 7000.0), None);
        assert_eq!(classifier.calibration_count(), 2);
        assert_eq!(classifier.current_pose(), Some(Pose::Neutral));
    }

    #[test]
    fn test_calibrate_requires_camera() {
        let mut classifier = PoseClassifier::new(&ClassifierConfig::default());
        assert!(!classifier.calibrate(0.0));
        assert!(!classifier.poll_calibration(10_000.0));
    }

    #[test]
    fn test_hand_height_is_normalized_and_clamped() {
        let mut classifier = calibrated_classifier();
        classifier.process_landmarks(hand_at(120.0), 480.0, 3100.0);
        assert_eq!(classifier.state().hand_y_normalized, 0.25);
        classifier.process_landmarks(hand_at(900.0), 480.0, 3116.0);
        assert_eq!(classifier.state().hand_y_normalized, 1.0);
    }

    #[test]
    fn test_fallback_mode_motion_path() {
        let mut classifier = PoseClassifier::new(&ClassifierConfig::default());
        classifier.set_model_available(false);
        assert!(classifier.is_fallback());
        assert_eq!(classifier.status(), DetectorStatus::ModelFallback);

        classifier.camera_started(4.0, 4.0);
        let dark = vec![0u8; 64];
        let bright = vec![255u8; 64];
        // Uncalibrated: never fires no matter how much motion
        for i in 0..200 {
            let frame = if i % 2 == 0 { &dark } else { &bright };
            assert_eq!(classifier.process_motion(frame, 4, 4, i as f64), None);
        }

        classifier.calibrate(0.0);
        classifier.poll_calibration(3000.0);
        let mut fired = Vec::new();
        for i in 0..2000 {
            let frame = if i % 2 == 0 { &dark } else { &bright };
            if let Some(pose) = classifier.process_motion(frame, 4, 4, 3000.0 + i as f64) {
                fired.push(pose);
            }
        }
        assert!(!fired.is_empty());
        // Consecutive transitions always change pose
        assert!(fired.windows(2).all(|w| w[0] != w[1]));
        assert_ne!(fired[0], Pose::Neutral);
        assert_eq!(classifier.accuracy_percent(), 0);
    }
}
