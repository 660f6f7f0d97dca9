//! HUD and page text
//!
//! Everything the host page shows as HTML text: the HUD counters, the message
//! panel, button availability and the diagnostics readout. Pure functions of
//! session and classifier state.

use serde::Serialize;

use crate::classifier::{DetectorStatus, PoseClassifier};
use crate::game::{GameState, SessionStats};

pub fn format_score(score: u32) -> String {
    format!("{:05}", score)
}

pub fn format_speed(speed: f64) -> String {
    format!("x{:.1}", speed)
}

/// Whole seconds as `mm:ss`
pub fn format_time(elapsed_secs: f64) -> String {
    let total = elapsed_secs.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn format_accuracy(percent: u32) -> String {
    format!("{}%", percent)
}

/// HUD counters, serialized to JSON for the host
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HudText {
    pub score: String,
    pub high_score: String,
    pub speed: String,
    pub time: String,
    pub avoided: String,
    pub accuracy: String,
}

impl HudText {
    pub fn new(stats: &SessionStats, accuracy_percent: u32) -> Self {
        Self {
            score: format_score(stats.score),
            high_score: format_score(stats.high_score),
            speed: format_speed(stats.speed),
            time: format_time(stats.elapsed_secs),
            avoided: stats.obstacles_avoided.to_string(),
            accuracy: format_accuracy(accuracy_percent),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageAction {
    Start,
    Calibrate,
    Resume,
    Restart,
}

impl MessageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageAction::Start => "start",
            MessageAction::Calibrate => "calibrate",
            MessageAction::Resume => "resume",
            MessageAction::Restart => "restart",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageAction::Start => "Start Game",
            MessageAction::Calibrate => "Calibrate",
            MessageAction::Resume => "Resume",
            MessageAction::Restart => "Play Again",
        }
    }
}

/// Message panel prompt
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub title: &'static str,
    pub text: String,
    pub action: MessageAction,
}

impl Message {
    fn new(title: &'static str, text: impl Into<String>, action: MessageAction) -> Self {
        Self {
            title,
            text: text.into(),
            action,
        }
    }
}

/// Prompt for the current state; `None` while playing (panel hidden)
pub fn message_for(stats: &SessionStats, classifier: &PoseClassifier) -> Option<Message> {
    let message = match stats.state {
        GameState::Playing => return None,
        GameState::Paused => Message::new("GAME PAUSED", "Click Resume to continue", MessageAction::Resume),
        GameState::GameOver if stats.new_high_score => Message::new(
            "GAME OVER",
            format!("NEW HIGH SCORE: {}", stats.score),
            MessageAction::Restart,
        ),
        GameState::GameOver => Message::new("GAME OVER", format!("SCORE: {}", stats.score), MessageAction::Restart),
        GameState::Idle if classifier.is_calibrated() => {
            Message::new("CALIBRATION COMPLETE", "Start the game!", MessageAction::Start)
        }
        GameState::Idle if classifier.is_camera_on() => {
            Message::new("CAMERA ACTIVE", "Calibrate then start the game", MessageAction::Calibrate)
        }
        GameState::Idle if classifier.status() == DetectorStatus::CameraStopped => {
            Message::new("CAMERA STOPPED", "Start camera to play", MessageAction::Start)
        }
        GameState::Idle => Message::new(
            "WEBCAM DINO GAME",
            "Start camera and click Start Game to play",
            MessageAction::Start,
        ),
    };
    Some(message)
}

/// Which page buttons are enabled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ControlAvailability {
    pub calibrate: bool,
    pub start: bool,
    pub pause: bool,
    pub pause_label: &'static str,
}

impl ControlAvailability {
    pub fn new(state: GameState, camera_on: bool, calibrated: bool) -> Self {
        Self {
            calibrate: camera_on,
            start: camera_on && calibrated,
            pause: matches!(state, GameState::Playing | GameState::Paused),
            pause_label: if state == GameState::Paused { "Resume" } else { "Pause" },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Multi-line readout shown next to the camera preview
pub fn diagnostics_text(classifier: &PoseClassifier) -> String {
    let state = classifier.state();
    let headline = if state.hand_detected {
        "HAND DETECTED ✓"
    } else {
        "SHOW YOUR HAND"
    };
    let pose = state.current_pose.map(|p| p.as_str()).unwrap_or("waiting");
    let mut text = format!(
        "{}\nPose: {}\nAccuracy: {}",
        headline,
        pose,
        format_accuracy(classifier.accuracy_percent())
    );
    if state.hand_detected {
        text.push_str(&format!("\nHand: {:.0}%", state.hand_y_normalized * 100.0));
    }
    if classifier.is_fallback() {
        text.push_str(&format!(
            "\nMode: motion fallback\nMotion: {:.0}%",
            classifier.motion_level() * 100.0
        ));
    }
    text
}
