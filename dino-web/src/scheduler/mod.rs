//! Frame scheduling for the detection and game loops

mod frame_loop;

pub use frame_loop::{FrameLoop, LoopState};
