//! WASM entry points
//!
//! The controller and the camera live in thread-locals (WASM is
//! single-threaded). Borrows never span an `.await`.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use super::camera::Camera;
use super::camera_slot::CameraSlot;
use super::controller::Controller;
use super::storage::LocalStorageStore;
use crate::config::AppConfig;
use crate::game::{HighScoreStore, MemoryStore};
use crate::renderer::Vertex;

/// Slack added to the calibration timeout so it lands after the deadline
const CALIBRATION_SLACK_MS: f64 = 100.0;

thread_local! {
    static CONTROLLER: RefCell<Controller> = RefCell::new(new_controller(AppConfig::default()));
    static CAMERA: RefCell<CameraSlot<Camera>> = const { RefCell::new(CameraSlot::new()) };
}

fn new_controller(config: AppConfig) -> Controller {
    let store = open_store(&config.high_score_key);
    Controller::new(config, store)
}

fn open_store(key: &str) -> Box<dyn HighScoreStore> {
    match LocalStorageStore::open(key) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{}; high score will not persist", e);
            Box::new(MemoryStore::new())
        }
    }
}

fn with_controller<R>(f: impl FnOnce(&mut Controller) -> R) -> R {
    CONTROLLER.with(|cell| f(&mut cell.borrow_mut()))
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Canvas size from the active config
pub fn canvas_size() -> (u32, u32) {
    with_controller(|c| {
        let game = &c.config().game;
        (game.canvas_width as u32, game.canvas_height as u32)
    })
}

/// Clip-space vertices for the current frame
pub fn frame_vertices() -> Vec<Vertex> {
    with_controller(|c| c.frame_vertices())
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Replace the configuration. Resets game and classifier state; call before
/// `init()` so the canvas picks up the new size.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = AppConfig::from_json(json)?;
    CAMERA.with(|cell| cell.borrow_mut().stop());
    let controller = new_controller(config);
    with_controller(|c| *c = controller);
    log::info!("Configuration applied");
    Ok(())
}

/// Request the webcam. On failure the camera stays off and the error is
/// returned to the caller. A call while the camera is running or starting is
/// a no-op; a `stop_camera()` issued before acquisition resolves wins.
#[wasm_bindgen]
pub async fn start_camera(video_id: String) -> Result<(), JsValue> {
    let ticket = match CAMERA.with(|cell| cell.borrow_mut().begin()) {
        Some(ticket) => ticket,
        None => return Ok(()),
    };

    match Camera::start(&video_id).await {
        Ok(camera) => {
            let (w, h) = camera.frame_size();
            if CAMERA.with(|cell| cell.borrow_mut().finish(ticket, camera)) {
                with_controller(|c| c.camera_started(w, h));
            }
            Ok(())
        }
        Err(e) => {
            if !CAMERA.with(|cell| cell.borrow_mut().fail(ticket)) {
                log::debug!("Camera start failed after a stop: {}", e);
                return Ok(());
            }
            log::error!("Camera error: {}", e);
            with_controller(|c| c.camera_failed());
            Err(e.into())
        }
    }
}

/// Release the webcam, cancel a start in flight and drop pose state
#[wasm_bindgen]
pub fn stop_camera() {
    CAMERA.with(|cell| cell.borrow_mut().stop());
    with_controller(|c| c.camera_stopped());
}

#[wasm_bindgen]
pub fn set_landmark_model_available(available: bool) {
    with_controller(|c| c.set_model_available(available));
}

/// Arm calibration; completes on the first detection cycle after the delay,
/// or on the timer scheduled here if no cycle arrives.
#[wasm_bindgen]
pub fn calibrate() -> bool {
    let (armed, delay_ms) = with_controller(|c| (c.calibrate(now_ms()), c.config().classifier.calibration_ms));
    if armed {
        schedule_calibration_check(delay_ms + CALIBRATION_SLACK_MS);
    }
    armed
}

fn schedule_calibration_check(delay_ms: f64) {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return,
    };
    let callback = Closure::once_into_js(|| {
        with_controller(|c| c.poll_calibration(now_ms()));
    });
    if let Err(e) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms.ceil() as i32)
    {
        log::warn!("Failed to schedule calibration check: {:?}", e);
    }
}

/// One landmark cycle: a flat `[x, y(, z)]` array for one hand, or empty when
/// no hand was found. Returns the pose that fired, if any.
#[wasm_bindgen]
pub fn detection_frame(landmarks: &[f32], frame_width: f32, frame_height: f32) -> Option<String> {
    with_controller(|c| c.detection_frame(landmarks, frame_width, frame_height, now_ms()))
        .map(|pose| pose.as_str().to_string())
}

/// The landmark model threw on this frame
#[wasm_bindgen]
pub fn detection_failed() -> Option<String> {
    with_controller(|c| c.detection_failed(now_ms())).map(|pose| pose.as_str().to_string())
}

/// One fallback cycle over raw RGBA pixels
#[wasm_bindgen]
pub fn motion_frame(rgba: &[u8], width: u32, height: u32) -> Option<String> {
    with_controller(|c| c.motion_frame(rgba, width, height, now_ms())).map(|pose| pose.as_str().to_string())
}

#[wasm_bindgen]
pub fn start_game() {
    with_controller(|c| c.start_game());
}

#[wasm_bindgen]
pub fn toggle_pause() -> String {
    with_controller(|c| c.toggle_pause()).as_str().to_string()
}

#[wasm_bindgen]
pub fn reset_game() {
    with_controller(|c| c.reset_game());
}

/// Advance the game by one display refresh. Keep calling
/// `requestAnimationFrame` only while this returns true.
#[wasm_bindgen]
pub fn game_frame(timestamp_ms: f64) -> bool {
    with_controller(|c| c.game_frame(timestamp_ms))
}

/// Returns true when the host should `preventDefault()`
#[wasm_bindgen]
pub fn key_down(code: &str) -> bool {
    with_controller(|c| c.key_down(code))
}

#[wasm_bindgen]
pub fn key_up(code: &str) -> bool {
    with_controller(|c| c.key_up(code))
}

#[wasm_bindgen]
pub fn set_diagnostics(enabled: bool) {
    with_controller(|c| c.set_diagnostics(enabled));
}

// ============================================================================
// QUERIES
// ============================================================================

#[wasm_bindgen]
pub fn game_state() -> String {
    with_controller(|c| c.game().state().as_str().to_string())
}

#[wasm_bindgen]
pub fn current_pose() -> Option<String> {
    with_controller(|c| c.classifier().current_pose().map(|p| p.as_str().to_string()))
}

#[wasm_bindgen]
pub fn display_pose() -> String {
    with_controller(|c| c.classifier().state().display_pose.as_str().to_string())
}

#[wasm_bindgen]
pub fn detection_accuracy() -> u32 {
    with_controller(|c| c.classifier().accuracy_percent())
}

#[wasm_bindgen]
pub fn is_calibrated() -> bool {
    with_controller(|c| c.classifier().is_calibrated())
}

#[wasm_bindgen]
pub fn is_camera_on() -> bool {
    with_controller(|c| c.classifier().is_camera_on())
}

#[wasm_bindgen]
pub fn is_fallback_mode() -> bool {
    with_controller(|c| c.classifier().is_fallback())
}

#[wasm_bindgen]
pub fn high_score() -> u32 {
    with_controller(|c| c.game().high_score())
}

/// HUD counters as JSON
#[wasm_bindgen]
pub fn hud_text() -> String {
    with_controller(|c| c.hud().to_json())
}

/// Button availability as JSON
#[wasm_bindgen]
pub fn control_state() -> String {
    with_controller(|c| c.controls().to_json())
}

#[wasm_bindgen]
pub fn status_text() -> String {
    with_controller(|c| c.classifier().status().text().to_string())
}

#[wasm_bindgen]
pub fn status_color() -> String {
    with_controller(|c| c.classifier().status().color().to_string())
}

/// `None` while the message panel is hidden
#[wasm_bindgen]
pub fn message_title() -> Option<String> {
    with_controller(|c| c.message().map(|m| m.title.to_string()))
}

#[wasm_bindgen]
pub fn message_text() -> Option<String> {
    with_controller(|c| c.message().map(|m| m.text))
}

#[wasm_bindgen]
pub fn message_action() -> Option<String> {
    with_controller(|c| c.message().map(|m| m.action.as_str().to_string()))
}

#[wasm_bindgen]
pub fn message_action_label() -> Option<String> {
    with_controller(|c| c.message().map(|m| m.action.label().to_string()))
}

#[wasm_bindgen]
pub fn diagnostics_text() -> String {
    with_controller(|c| c.diagnostics_text())
}
