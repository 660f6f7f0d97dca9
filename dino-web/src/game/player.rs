//! The dinosaur: jump physics and the two body heights

use super::aabb::Aabb;
use crate::config::GameConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    /// Top of the standing body; stays put while ducking
    pub y: f32,
    pub width: f32,
    /// Current height, either `normal_height` or `duck_height`
    pub height: f32,
    pub velocity_y: f32,
    pub is_jumping: bool,
    pub is_ducking: bool,
    normal_height: f32,
    duck_height: f32,
    rest_y: f32,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let rest_y = config.ground_y() - config.player_height;
        Self {
            x: config.player_x,
            y: rest_y,
            width: config.player_width,
            height: config.player_height,
            velocity_y: 0.0,
            is_jumping: false,
            is_ducking: false,
            normal_height: config.player_height,
            duck_height: config.player_duck_height,
            rest_y,
        }
    }

    pub fn reset(&mut self) {
        self.y = self.rest_y;
        self.velocity_y = 0.0;
        self.is_jumping = false;
        self.is_ducking = false;
        self.height = self.normal_height;
    }

    /// Start a jump. No-op while airborne. Clears ducking.
    pub fn jump(&mut self, jump_force: f32) -> bool {
        if self.is_jumping {
            return false;
        }
        self.is_jumping = true;
        self.velocity_y = jump_force;
        self.is_ducking = false;
        self.height = self.normal_height;
        true
    }

    /// Start ducking. Not possible while airborne.
    pub fn begin_duck(&mut self) -> bool {
        if self.is_jumping {
            return false;
        }
        self.is_ducking = true;
        self.height = self.duck_height;
        true
    }

    pub fn end_duck(&mut self) {
        self.is_ducking = false;
        self.height = self.normal_height;
    }

    /// One physics step: gravity, landing, body height
    pub fn step(&mut self, gravity: f32) {
        if self.is_jumping {
            self.velocity_y += gravity;
            self.y += self.velocity_y;

            if self.y >= self.rest_y {
                self.y = self.rest_y;
                self.is_jumping = false;
                self.velocity_y = 0.0;
            }
        }

        self.height = if self.is_ducking {
            self.duck_height
        } else {
            self.normal_height
        };
    }

    pub fn is_on_ground(&self) -> bool {
        !self.is_jumping
    }

    /// Collision box. A ducking body keeps its feet on the ground, so the box
    /// shrinks from the top; `y` still names the standing top edge. Keeping the
    /// top fixed instead would lift the feet off the ground and let rocks pass
    /// underneath a ducking player.
    pub fn bounds(&self) -> Aabb {
        let top = self.y + (self.normal_height - self.height);
        Aabb::new(self.x, top, self.width, self.height)
    }

    /// Resting y of the standing body
    pub fn rest_y(&self) -> f32 {
        self.rest_y
    }
}
