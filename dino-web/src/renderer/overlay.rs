//! Diagnostic overlay - pose zones, hand marker and landmark skeleton
//!
//! Drawn into an inset panel that stands for the camera frame. Landmark
//! pixel coordinates are scaled from the camera resolution to the panel.

use crate::classifier::{PoseClassifier, DUCK_THRESHOLD, HAND_SKELETON, JUMP_THRESHOLD, WRIST};

use super::shapes::ShapeBatch;

mod colors {
    pub const PANEL: [f32; 4] = [0.0, 0.0, 0.0, 0.7];
    pub const JUMP_ZONE: [f32; 4] = [0.302, 1.0, 0.569, 0.1];
    pub const JUMP_EDGE: [f32; 4] = [0.302, 1.0, 0.569, 0.5];
    pub const NEUTRAL_ZONE: [f32; 4] = [0.176, 0.251, 0.349, 0.1];
    pub const NEUTRAL_EDGE: [f32; 4] = [0.176, 0.251, 0.349, 0.5];
    pub const DUCK_ZONE: [f32; 4] = [0.992, 0.796, 0.431, 0.1];
    pub const DUCK_EDGE: [f32; 4] = [0.992, 0.796, 0.431, 0.5];
    pub const BONE: [f32; 4] = [0.302, 1.0, 0.569, 1.0];
    pub const JOINT: [f32; 4] = [0.302, 1.0, 0.569, 1.0];
    pub const WRIST: [f32; 4] = [1.0, 0.333, 0.333, 1.0];
}

/// Zone strip width as a fraction of the panel (200 px of a 640 px frame)
const ZONE_WIDTH_FRACTION: f32 = 200.0 / 640.0;

/// Screen rectangle the camera frame is mapped onto
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPanel {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl OverlayPanel {
    /// Top-right inset of a canvas, keeping a 4:3 camera aspect
    pub fn top_right(canvas_width: f32, canvas_height: f32) -> Self {
        let width = (canvas_width * 0.25).max(80.0);
        let height = (width * 0.75).min(canvas_height * 0.5);
        Self {
            x: canvas_width - width - 10.0,
            y: 50.0,
            width,
            height,
        }
    }

    /// Camera-frame pixels to canvas pixels
    pub fn map(&self, x: f32, y: f32, frame: (f32, f32)) -> (f32, f32) {
        (self.x + x / frame.0 * self.width, self.y + y / frame.1 * self.height)
    }
}

pub fn build_overlay(batch: &mut ShapeBatch, classifier: &PoseClassifier, panel: OverlayPanel) {
    let OverlayPanel { x, y, width, height } = panel;
    batch.rect(x, y, width, height, colors::PANEL);

    let zone_w = width * ZONE_WIDTH_FRACTION;
    let zone_x = x + (width - zone_w) / 2.0;
    let jump_h = height * JUMP_THRESHOLD;
    let duck_top = height * DUCK_THRESHOLD;

    batch.rect(zone_x, y, zone_w, jump_h, colors::JUMP_ZONE);
    batch.frame(zone_x, y, zone_w, jump_h, 1.0, colors::JUMP_EDGE);
    batch.rect(zone_x, y + jump_h, zone_w, duck_top - jump_h, colors::NEUTRAL_ZONE);
    batch.frame(zone_x, y + jump_h, zone_w, duck_top - jump_h, 1.0, colors::NEUTRAL_EDGE);
    batch.rect(zone_x, y + duck_top, zone_w, height - duck_top, colors::DUCK_ZONE);
    batch.frame(zone_x, y + duck_top, zone_w, height - duck_top, 1.0, colors::DUCK_EDGE);

    let state = classifier.state();
    if state.hand_detected {
        let marker_y = y + state.hand_y_normalized * height;
        batch.circle(x + width / 2.0, marker_y, 5.0, colors::WRIST);
    }

    if let Some(hand) = classifier.last_hand() {
        let frame = classifier.frame_size();
        for &(start, end) in HAND_SKELETON.iter() {
            let (x1, y1) = panel.map(hand.landmarks[start].x, hand.landmarks[start].y, frame);
            let (x2, y2) = panel.map(hand.landmarks[end].x, hand.landmarks[end].y, frame);
            batch.line(x1, y1, x2, y2, 1.0, colors::BONE);
        }
        for (i, lm) in hand.landmarks.iter().enumerate() {
            let (px, py) = panel.map(lm.x, lm.y, frame);
            let color = if i == WRIST { colors::WRIST } else { colors::JOINT };
            batch.circle(px, py, 2.0, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{HandFrame, HandLandmark, LANDMARK_COUNT};
    use crate::config::ClassifierConfig;

    #[test]
    fn test_panel_mapping() {
        let panel = OverlayPanel { x: 100.0, y: 50.0, width: 160.0, height: 120.0 };
        assert_eq!(panel.map(0.0, 0.0, (640.0, 480.0)), (100.0, 50.0));
        assert_eq!(panel.map(640.0, 480.0, (640.0, 480.0)), (260.0, 170.0));
    }

    #[test]
    fn test_skeleton_drawn_only_with_a_hand() {
        let panel = OverlayPanel::top_right(800.0, 400.0);
        let mut classifier = PoseClassifier::new(&ClassifierConfig::default());
        classifier.camera_started(640.0, 480.0);

        let mut bare = ShapeBatch::new();
        build_overlay(&mut bare, &classifier, panel);

        let mut landmarks = [HandLandmark::default(); LANDMARK_COUNT];
        for (i, lm) in landmarks.iter_mut().enumerate() {
            *lm = HandLandmark { x: 300.0 + i as f32 * 3.0, y: 200.0 + i as f32 * 5.0 };
        }
        classifier.process_landmarks(Some(HandFrame::new(landmarks)), 480.0, 0.0);
        let mut with_hand = ShapeBatch::new();
        build_overlay(&mut with_hand, &classifier, panel);

        // marker, bones, joints
        let expected = 16 * 3 + HAND_SKELETON.len() * 6 + LANDMARK_COUNT * 16 * 3;
        assert_eq!(with_hand.len(), bare.len() + expected);
    }
}
