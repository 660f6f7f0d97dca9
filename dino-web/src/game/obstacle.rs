//! Obstacles and the spawn rules
//!
//! Spawning is split into pure decisions over pre-rolled random values so the
//! rules can be checked without a random source.

use super::aabb::Aabb;
use crate::config::GameConfig;

/// Obstacle kinds, in the order a uniform roll selects them
pub const OBSTACLE_KINDS: [ObstacleKind; 3] = [ObstacleKind::Cactus, ObstacleKind::Bird, ObstacleKind::Rock];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Low ground obstacle of varying height
    Cactus,
    /// Flying obstacle; duck under it
    Bird,
    /// Squat ground obstacle
    Rock,
}

impl ObstacleKind {
    pub fn from_index(idx: usize) -> Self {
        OBSTACLE_KINDS[idx % OBSTACLE_KINDS.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Cactus => "cactus",
            ObstacleKind::Bird => "bird",
            ObstacleKind::Rock => "rock",
        }
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self, ObstacleKind::Bird)
    }

    pub fn width(&self) -> f32 {
        match self {
            ObstacleKind::Bird => 60.0,
            ObstacleKind::Cactus | ObstacleKind::Rock => 40.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height, kind }
    }

    /// Build an obstacle at the right edge of the canvas.
    ///
    /// `profile_roll` in [0, 1) picks the cactus height (60 to 100) or the bird
    /// altitude (top edge 180 to 130 px above the canvas bottom).
    ///
    /// Ground kinds sit on the ground line: a cactus grows upward from it, so
    /// its top edge moves with the rolled height instead of staying at a fixed
    /// `canvas_height - 80` and floating or sinking relative to the ground.
    pub fn spawn(kind: ObstacleKind, config: &GameConfig, profile_roll: f32) -> Self {
        let roll = profile_roll.clamp(0.0, 1.0);
        let (height, y) = match kind {
            ObstacleKind::Bird => (40.0, config.canvas_height - 180.0 + roll * 50.0),
            ObstacleKind::Rock => (50.0, config.ground_y() - 50.0),
            ObstacleKind::Cactus => {
                let height = 60.0 + roll * 40.0;
                (height, config.ground_y() - height)
            }
        };
        Self::new(kind, config.canvas_width, y, kind.width(), height)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }
}

/// Per-step spawn chance, growing slowly with score up to the cap
pub fn spawn_chance(config: &GameConfig, score: f64) -> f32 {
    let chance = config.spawn_chance + (score as f32) * config.spawn_chance_per_point;
    chance.min(config.max_spawn_chance)
}

/// Hard constraints: live obstacle cap and minimum time since the last spawn
pub fn spawn_allowed(config: &GameConfig, live_obstacles: usize, elapsed_secs: f64, last_spawn_secs: f64) -> bool {
    live_obstacles < config.max_obstacles && elapsed_secs - last_spawn_secs > config.min_spawn_gap_secs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_obstacles_rest_on_ground() {
        let config = GameConfig::default();
        for roll in [0.0, 0.5, 0.999] {
            let cactus = Obstacle::spawn(ObstacleKind::Cactus, &config, roll);
            assert!((cactus.bounds().bottom() - config.ground_y()).abs() < 1e-3);
            assert!(cactus.height >= 60.0 && cactus.height <= 100.0);
        }
        let rock = Obstacle::spawn(ObstacleKind::Rock, &config, 0.3);
        assert_eq!(rock.bounds().bottom(), config.ground_y());
        assert_eq!(rock.x, config.canvas_width);
    }

    #[test]
    fn test_birds_fly_above_a_ducking_player() {
        let config = GameConfig::default();
        let duck_top = config.ground_y() - config.player_duck_height;
        for roll in [0.0, 0.5, 1.0] {
            let bird = Obstacle::spawn(ObstacleKind::Bird, &config, roll);
            assert!(bird.kind.is_airborne());
            assert!(bird.bounds().bottom() <= duck_top);
        }
    }

    #[test]
    fn test_spawn_chance_grows_and_caps() {
        let config = GameConfig::default();
        assert_eq!(spawn_chance(&config, 0.0), 0.02);
        assert!(spawn_chance(&config, 1000.0) > 0.02);
        assert_eq!(spawn_chance(&config, 1.0e9), config.max_spawn_chance);
    }

    #[test]
    fn test_spawn_constraints() {
        let config = GameConfig::default();
        assert!(spawn_allowed(&config, 0, 1.5, 0.0));
        assert!(!spawn_allowed(&config, 3, 10.0, 0.0));
        assert!(!spawn_allowed(&config, 0, 1.0, 0.0));
        assert!(!spawn_allowed(&config, 1, 5.5, 5.0));
    }

    #[test]
    fn test_off_screen_needs_right_edge_past_zero() {
        let mut rock = Obstacle::new(ObstacleKind::Rock, -40.0, 330.0, 40.0, 50.0);
        assert!(!rock.is_off_screen());
        rock.x = -40.5;
        assert!(rock.is_off_screen());
    }
}
