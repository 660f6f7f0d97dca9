//! Controller - owns the classifier, the game and the game loop
//!
//! Every host command lands here with an explicit timestamp, so the whole
//! camera -> pose -> command -> simulation path runs without a browser.

use crate::classifier::{HandFrame, Pose, PoseClassifier};
use crate::config::AppConfig;
use crate::game::{DinoGame, GameState, HighScoreStore};
use crate::renderer::{self, ControlAvailability, HudText, Message, Vertex};
use crate::scheduler::FrameLoop;

use super::control::{dispatch_pose, Command};
use super::keyboard::{command_for_key, is_game_key};

pub struct Controller {
    config: AppConfig,
    classifier: PoseClassifier,
    game: DinoGame,
    game_loop: FrameLoop,
    diagnostics: bool,
}

impl Controller {
    pub fn new(config: AppConfig, store: Box<dyn HighScoreStore>) -> Self {
        Self {
            classifier: PoseClassifier::new(&config.classifier),
            game: DinoGame::new(config.game.clone(), store),
            game_loop: FrameLoop::new(config.game.max_frame_delta_ms),
            diagnostics: config.diagnostics,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Camera and model
    // ------------------------------------------------------------------

    pub fn set_model_available(&mut self, available: bool) {
        self.classifier.set_model_available(available);
    }

    pub fn camera_started(&mut self, frame_width: f32, frame_height: f32) {
        self.classifier.camera_started(frame_width, frame_height);
        log::info!("Camera started ({}x{})", frame_width, frame_height);
    }

    pub fn camera_failed(&mut self) {
        self.classifier.camera_failed();
    }

    pub fn camera_stopped(&mut self) {
        self.classifier.stop();
        log::info!("Camera stopped");
    }

    pub fn calibrate(&mut self, now_ms: f64) -> bool {
        self.classifier.calibrate(now_ms)
    }

    pub fn poll_calibration(&mut self, now_ms: f64) -> bool {
        let latches = self.classifier.calibration_count();
        let done = self.classifier.poll_calibration(now_ms);
        self.sync_calibration(latches);
        done
    }

    /// A calibration latch resets the classifier to neutral without firing a
    /// transition; mirror that on the player so the next neutral hand is not lost.
    fn sync_calibration(&mut self, latches_before: u32) {
        if self.classifier.calibration_count() != latches_before && self.game.player().is_ducking {
            log::debug!("Calibration reset the pose, standing the player up");
            Command::EndDuck.apply(&mut self.game);
        }
    }

    // ------------------------------------------------------------------
    // Detection cycles
    // ------------------------------------------------------------------

    /// One landmark cycle. An empty slice means no hand; a malformed one
    /// counts as a failed cycle.
    pub fn detection_frame(&mut self, landmarks: &[f32], frame_width: f32, frame_height: f32, now_ms: f64) -> Option<Pose> {
        let latches = self.classifier.calibration_count();
        self.classifier.resize_frame(frame_width, frame_height);
        let fired = if landmarks.is_empty() {
            self.classifier.process_landmarks(None, frame_height, now_ms)
        } else {
            match HandFrame::from_flat(landmarks) {
                Some(hand) => self.classifier.process_landmarks(Some(hand), frame_height, now_ms),
                None => {
                    log::warn!("Malformed landmark payload ({} values)", landmarks.len());
                    self.classifier.detection_failed(now_ms)
                }
            }
        };
        self.forward(latches, fired)
    }

    pub fn detection_failed(&mut self, now_ms: f64) -> Option<Pose> {
        let latches = self.classifier.calibration_count();
        let fired = self.classifier.detection_failed(now_ms);
        self.forward(latches, fired)
    }

    pub fn motion_frame(&mut self, rgba: &[u8], width: u32, height: u32, now_ms: f64) -> Option<Pose> {
        let latches = self.classifier.calibration_count();
        let fired = self.classifier.process_motion(rgba, width, height, now_ms);
        self.forward(latches, fired)
    }

    fn forward(&mut self, latches_before: u32, fired: Option<Pose>) -> Option<Pose> {
        self.sync_calibration(latches_before);
        if let Some(pose) = fired {
            dispatch_pose(pose, &mut self.game);
        }
        fired
    }

    // ------------------------------------------------------------------
    // Game
    // ------------------------------------------------------------------

    pub fn start_game(&mut self) {
        self.game.start();
        if !self.game_loop.is_running() {
            self.game_loop.start();
        }
    }

    pub fn toggle_pause(&mut self) -> GameState {
        let state = self.game.toggle_pause();
        match state {
            GameState::Paused => self.game_loop.pause(),
            GameState::Playing => self.game_loop.resume(),
            _ => {}
        }
        state
    }

    pub fn reset_game(&mut self) {
        self.game.reset();
        self.game_loop.stop();
    }

    /// One animation frame of the game loop. Returns whether the host should
    /// schedule another one.
    pub fn game_frame(&mut self, now_ms: f64) -> bool {
        let delta_ms = match self.game_loop.advance(now_ms) {
            Some(delta) => delta,
            None => return false,
        };
        self.game.step(delta_ms);

        if self.game.state() != GameState::Playing {
            self.game_loop.stop();
            return false;
        }
        true
    }

    /// Keyboard input. Returns true when the host should swallow the key,
    /// which is only for game keys while a run is in progress.
    pub fn key_down(&mut self, code: &str) -> bool {
        self.key_event(code, true)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.key_event(code, false)
    }

    fn key_event(&mut self, code: &str, pressed: bool) -> bool {
        if self.game.state() != GameState::Playing {
            return false;
        }
        if let Some(command) = command_for_key(code, pressed) {
            command.apply(&mut self.game);
        }
        is_game_key(code)
    }

    pub fn set_diagnostics(&mut self, enabled: bool) {
        self.diagnostics = enabled;
        log::info!("Diagnostics {}", if enabled { "on" } else { "off" });
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    pub fn game(&self) -> &DinoGame {
        &self.game
    }

    pub fn classifier(&self) -> &PoseClassifier {
        &self.classifier
    }

    pub fn diagnostics(&self) -> bool {
        self.diagnostics
    }

    pub fn hud(&self) -> HudText {
        HudText::new(&self.game.stats(), self.classifier.accuracy_percent())
    }

    pub fn message(&self) -> Option<Message> {
        renderer::message_for(&self.game.stats(), &self.classifier)
    }

    pub fn controls(&self) -> ControlAvailability {
        ControlAvailability::new(
            self.game.state(),
            self.classifier.is_camera_on(),
            self.classifier.is_calibrated(),
        )
    }

    pub fn diagnostics_text(&self) -> String {
        renderer::diagnostics_text(&self.classifier)
    }

    pub fn frame_vertices(&self) -> Vec<Vertex> {
        renderer::build_frame(&self.game, &self.classifier, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{LANDMARK_COUNT, WRIST};
    use crate::game::MemoryStore;

    fn quiet_controller() -> Controller {
        let mut config = AppConfig::default();
        config.game.spawn_chance = 0.0;
        config.game.spawn_chance_per_point = 0.0;
        Controller::new(config, Box::new(MemoryStore::new()))
    }

    fn hand_at(wrist_y: f32) -> Vec<f32> {
        let mut flat = vec![320.0; LANDMARK_COUNT * 2];
        flat[WRIST * 2 + 1] = wrist_y;
        flat
    }

    #[test]
    fn test_game_loop_stops_on_pause_and_reset() {
        let mut c = quiet_controller();
        assert!(!c.game_frame(0.0));

        c.start_game();
        assert!(c.game_frame(1000.0));
        assert!(c.game_frame(1016.0));
        assert_eq!(c.game().elapsed_secs(), 0.016);

        c.toggle_pause();
        assert!(!c.game_frame(5000.0));
        c.toggle_pause();
        assert!(c.game_frame(9000.0));
        assert_eq!(c.game().elapsed_secs(), 0.016);

        c.reset_game();
        assert!(!c.game_frame(9016.0));
        assert_eq!(c.game().state(), GameState::Idle);
    }

    #[test]
    fn test_hand_pose_drives_the_dino() {
        let mut c = quiet_controller();
        c.camera_started(640.0, 480.0);
        c.start_game();
        c.game_frame(0.0);

        // Uncalibrated: the hand is classified but nothing fires
        assert_eq!(c.detection_frame(&hand_at(50.0), 640.0, 480.0, 0.0), None);
        assert!(!c.game().player().is_jumping);

        assert!(c.calibrate(0.0));
        assert_eq!(c.detection_frame(&hand_at(50.0), 640.0, 480.0, 3000.0), Some(Pose::Jump));
        assert!(c.game().player().is_jumping);
        assert_eq!(c.detection_frame(&hand_at(50.0), 640.0, 480.0, 3016.0), None);
    }

    #[test]
    fn test_malformed_payload_counts_as_a_miss() {
        let mut c = quiet_controller();
        c.camera_started(640.0, 480.0);
        c.detection_frame(&hand_at(240.0), 640.0, 480.0, 0.0);
        assert_eq!(c.detection_frame(&[1.0, 2.0, 3.0], 640.0, 480.0, 16.0), None);
        assert_eq!(c.classifier().accuracy_percent(), 50);
        assert_eq!(c.hud().accuracy, "50%");
    }

    #[test]
    fn test_keyboard_controls() {
        let mut c = quiet_controller();
        // Keys pass through to the page until a run starts
        assert!(!c.key_down("Space"));
        assert!(!c.key_down("ArrowDown"));
        c.start_game();
        assert!(c.key_down("ArrowDown"));
        assert!(c.game().player().is_ducking);
        assert!(c.key_up("ArrowDown"));
        assert!(!c.game().player().is_ducking);
        assert!(c.key_down("Space"));
        assert!(c.game().player().is_jumping);
        assert!(!c.key_down("KeyQ"));
        // Key-up of a jump key is swallowed but does nothing
        assert!(c.key_up("Space"));

        c.toggle_pause();
        assert!(!c.key_down("ArrowUp"));
    }

    #[test]
    fn test_recalibrating_mid_duck_stands_the_dino_up() {
        let mut c = quiet_controller();
        c.camera_started(640.0, 480.0);
        c.calibrate(0.0);
        c.poll_calibration(3000.0);
        c.start_game();

        assert_eq!(c.detection_frame(&hand_at(420.0), 640.0, 480.0, 3016.0), Some(Pose::Duck));
        assert!(c.game().player().is_ducking);

        assert!(c.calibrate(4000.0));
        assert!(c.poll_calibration(7000.0));
        assert!(!c.game().player().is_ducking);

        // Hand back in the middle: already neutral on both sides, nothing to fire
        assert_eq!(c.detection_frame(&hand_at(240.0), 640.0, 480.0, 7016.0), None);
        assert!(!c.game().player().is_ducking);

        // The next duck fires again
        assert_eq!(c.detection_frame(&hand_at(420.0), 640.0, 480.0, 7032.0), Some(Pose::Duck));
        assert!(c.game().player().is_ducking);
    }

    #[test]
    fn test_recalibration_inside_a_detection_cycle_also_stands_up() {
        let mut c = quiet_controller();
        c.camera_started(640.0, 480.0);
        c.calibrate(0.0);
        c.poll_calibration(3000.0);
        c.start_game();
        c.detection_frame(&hand_at(420.0), 640.0, 480.0, 3016.0);

        c.calibrate(4000.0);
        // The latch completes inside this cycle
        assert_eq!(c.detection_frame(&hand_at(420.0), 640.0, 480.0, 7000.0), Some(Pose::Duck));
        assert!(c.game().player().is_ducking);
    }

    #[test]
    fn test_controls_follow_camera_and_calibration() {
        let mut c = quiet_controller();
        assert!(!c.controls().calibrate);
        c.camera_started(640.0, 480.0);
        assert!(c.controls().calibrate);
        assert!(!c.controls().start);
        c.calibrate(0.0);
        c.poll_calibration(3000.0);
        assert!(c.controls().start);
        assert_eq!(c.message().map(|m| m.title), Some("CALIBRATION COMPLETE"));
        c.camera_stopped();
        assert!(!c.controls().start);
    }
}
