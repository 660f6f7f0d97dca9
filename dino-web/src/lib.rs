//! Dino Web - a dinosaur runner steered by hand height in front of a webcam
//!
//! The JS host drives two loops (landmark detection and the game frame) and
//! forwards everything into `bridge`. This file holds the module tree and the
//! three lifecycle exports; the rest of the wasm surface lives in `bridge::app`.

pub mod bridge;
pub mod classifier;
pub mod config;
pub mod game;
pub mod renderer;
pub mod scheduler;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Canvas element the game is drawn into
#[cfg(target_arch = "wasm32")]
const CANVAS_ID: &str = "game-canvas";

/// Runs once when the module is instantiated
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// Bring up WebGPU on the game canvas. `render_frame` is a no-op until this resolves.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn init() -> Result<(), JsValue> {
    let (width, height) = bridge::canvas_size();
    renderer::initialize_gpu(CANVAS_ID, width, height).await?;
    Ok(())
}

/// Render one frame of the current game and overlay state
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_frame() {
    let vertices = bridge::frame_vertices();
    renderer::submit_frame(&vertices);
}
