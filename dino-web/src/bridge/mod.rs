//! Bridge module - pose transitions to game commands, and JS <-> Rust glue
//!
//! `camera_slot`, `control`, `keyboard` and `controller` are plain Rust. The browser-facing
//! parts (camera, storage, #[wasm_bindgen] entry points) only build for wasm32.

mod camera_slot;
mod control;
mod controller;
mod keyboard;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod camera;
#[cfg(target_arch = "wasm32")]
mod storage;

pub use camera_slot::{CameraSlot, MediaSource, StartTicket};
pub use control::{dispatch_pose, Command, GameCommands};
pub use controller::Controller;
pub use keyboard::{command_for_key, is_game_key};

#[cfg(target_arch = "wasm32")]
pub use app::{canvas_size, frame_vertices};
#[cfg(target_arch = "wasm32")]
pub use camera::{Camera, CameraError};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
