//! Game scene - background, ground, obstacles and the dinosaur
//!
//! A pure read of the session: builds pixel-space shapes, mutates nothing.

use std::f32::consts::{FRAC_PI_4, PI};

use super::shapes::{create_arc_vertices, create_gradient_rect_vertices, ShapeBatch};
use crate::game::{Background, DinoGame, Obstacle, ObstacleKind, Player};

/// Colors for scene elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.047, 0.078, 0.153, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.102, 0.102, 0.180, 1.0];
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.7];
    pub const GROUND: [f32; 4] = [0.333, 0.333, 0.333, 1.0];
    pub const GROUND_STRIPE: [f32; 4] = [0.267, 0.267, 0.267, 1.0];
    pub const DINO: [f32; 4] = [0.302, 1.0, 0.569, 1.0];
    pub const DINO_FACE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const CACTUS: [f32; 4] = [0.2, 0.8, 0.451, 1.0];
    pub const BIRD: [f32; 4] = [0.882, 0.439, 0.333, 1.0];
    pub const ROCK: [f32; 4] = [0.667, 0.667, 0.667, 1.0];
}

const STRIPE_SPACING: f32 = 30.0;

pub fn obstacle_color(kind: ObstacleKind) -> [f32; 4] {
    match kind {
        ObstacleKind::Cactus => colors::CACTUS,
        ObstacleKind::Bird => colors::BIRD,
        ObstacleKind::Rock => colors::ROCK,
    }
}

/// Everything the game canvas shows, back to front
pub fn build_scene(batch: &mut ShapeBatch, game: &DinoGame) {
    let config = game.config();
    let (width, height) = (config.canvas_width, config.canvas_height);

    batch.extend(create_gradient_rect_vertices(0.0, 0.0, width, height, colors::SKY_TOP, colors::SKY_BOTTOM));
    build_background(batch, game.background());
    build_ground(batch, width, config.ground_y(), config.ground_height);

    for obstacle in game.obstacles() {
        build_obstacle(batch, obstacle);
    }
    build_player(batch, game.player());
}

fn build_background(batch: &mut ShapeBatch, background: &Background) {
    for star in &background.stars {
        batch.rect(star.x, star.y, star.size, star.size, [1.0, 1.0, 1.0, star.brightness]);
    }

    // Three overlapping puffs per cloud
    for cloud in &background.clouds {
        let (x, y, w, h) = (cloud.x, cloud.y, cloud.width, cloud.height);
        batch.ellipse(x, y, w / 2.0, h / 2.0, 0.0, colors::CLOUD);
        batch.ellipse(x + w / 3.0, y - h / 4.0, w / 3.0, h / 2.0, 0.0, colors::CLOUD);
        batch.ellipse(x - w / 3.0, y - h / 4.0, w / 3.0, h / 2.0, 0.0, colors::CLOUD);
    }
}

fn build_ground(batch: &mut ShapeBatch, width: f32, ground_y: f32, ground_height: f32) {
    batch.rect(0.0, ground_y, width, ground_height, colors::GROUND);

    let mut x = 0.0;
    while x < width {
        batch.rect(x, ground_y, 15.0, 3.0, colors::GROUND_STRIPE);
        x += STRIPE_SPACING;
    }
}

pub fn build_obstacle(batch: &mut ShapeBatch, obstacle: &Obstacle) {
    let color = obstacle_color(obstacle.kind);
    let (x, y, w, h) = (obstacle.x, obstacle.y, obstacle.width, obstacle.height);

    match obstacle.kind {
        ObstacleKind::Cactus => {
            batch.rect(x, y, 15.0, h, color);
            batch.rect(x - 10.0, y + h - 30.0, 35.0, 15.0, color);
            batch.rect(x - 5.0, y + h - 50.0, 25.0, 10.0, color);
        }
        ObstacleKind::Bird => {
            let (cx, cy) = (x + w / 2.0, y + h / 2.0);
            batch.ellipse(cx, cy, w / 2.0, h / 2.0, 0.0, color);
            batch.ellipse(cx - 15.0, cy, 10.0, 5.0, FRAC_PI_4, color);
        }
        ObstacleKind::Rock => {
            batch.ellipse(x + w / 2.0, y + h / 2.0, w / 2.0, h / 2.0, 0.0, color);
        }
    }
}

pub fn build_player(batch: &mut ShapeBatch, player: &Player) {
    let body = player.bounds();
    let (x, y, w, h) = (body.x, body.y, body.width, body.height);

    if player.is_ducking {
        batch.rect(x, y, w, h, colors::DINO);
        batch.ellipse(x + w - 10.0, y + 10.0, 15.0, 10.0, 0.0, colors::DINO);
        return;
    }

    // Body, legs, tail, head
    batch.rect(x, y, w - 20.0, h, colors::DINO);
    batch.rect(x + 10.0, y + h - 10.0, 15.0, 20.0, colors::DINO);
    batch.rect(x + 30.0, y + h - 10.0, 15.0, 20.0, colors::DINO);
    batch.rect(x - 15.0, y + 20.0, 15.0, 10.0, colors::DINO);
    batch.ellipse(x + w - 20.0, y + 20.0, 20.0, 15.0, 0.0, colors::DINO);

    batch.circle(x + w - 25.0, y + 15.0, 3.0, colors::DINO_FACE);
    batch.extend(create_arc_vertices(x + w - 30.0, y + 25.0, 8.0, 0.0, PI, 1.0, colors::DINO_FACE, 8));
}
