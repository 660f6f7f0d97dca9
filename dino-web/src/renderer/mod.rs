//! Renderer module - scene building plus the WebGPU backend
//!
//! `build_frame` is a pure read of game and classifier state; the GPU side
//! only uploads what it is given.

mod hud;
mod overlay;
mod scene;
mod shapes;

#[cfg(target_arch = "wasm32")]
mod gpu;

pub use hud::{
    diagnostics_text, format_accuracy, format_score, format_speed, format_time, message_for, ControlAvailability,
    HudText, Message, MessageAction,
};
pub use overlay::{build_overlay, OverlayPanel};
pub use scene::{build_obstacle, build_player, build_scene, obstacle_color};
pub use shapes::{
    create_circle_vertices, create_ellipse_vertices, create_line_vertices, create_rect_vertices, Color, ShapeBatch,
    Vertex, Viewport,
};

#[cfg(target_arch = "wasm32")]
pub use gpu::{initialize_gpu, submit_frame, GpuStateError};

use crate::classifier::PoseClassifier;
use crate::game::DinoGame;

/// Clip-space vertices for one frame: the scene, then the overlay when enabled
pub fn build_frame(game: &DinoGame, classifier: &PoseClassifier, diagnostics: bool) -> Vec<Vertex> {
    let config = game.config();
    let mut batch = ShapeBatch::new();
    build_scene(&mut batch, game);
    if diagnostics {
        let panel = OverlayPanel::top_right(config.canvas_width, config.canvas_height);
        build_overlay(&mut batch, classifier, panel);
    }
    batch.into_clip_space(Viewport::new(config.canvas_width, config.canvas_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClassifierConfig, GameConfig};
    use crate::game::MemoryStore;

    #[test]
    fn test_frame_is_finite_and_overlay_is_optional() {
        let game = DinoGame::new(GameConfig::default(), Box::new(MemoryStore::new()));
        let classifier = PoseClassifier::new(&ClassifierConfig::default());

        let plain = build_frame(&game, &classifier, false);
        let diag = build_frame(&game, &classifier, true);
        assert!(diag.len() > plain.len());
        assert_eq!(plain.len() % 3, 0);

        assert!(plain.iter().all(|v| v.position.iter().all(|c| c.is_finite())));
        // Sky gradient covers the canvas corner to corner
        assert_eq!(plain[0].position, [-1.0, 1.0]);
        assert_eq!(plain[2].position, [1.0, -1.0]);
    }
}
