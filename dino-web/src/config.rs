//! Runtime configuration
//!
//! Every field has a default taken from the tuned game, so the host may pass a
//! partial JSON object to `configure()` and only override what it needs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration from the host
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

impl From<ConfigError> for wasm_bindgen::JsValue {
    fn from(err: ConfigError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

/// Simulation tuning. Distances are canvas pixels, velocities are pixels per step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Height of the ground strip at the bottom of the canvas
    pub ground_height: f32,

    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_duck_height: f32,

    pub gravity: f32,
    /// Initial vertical velocity of a jump (negative = up)
    pub jump_force: f32,

    pub obstacle_speed: f32,
    /// Base spawn chance per step
    pub spawn_chance: f32,
    /// Extra spawn chance per score point
    pub spawn_chance_per_point: f32,
    pub max_spawn_chance: f32,
    pub max_obstacles: usize,
    pub min_spawn_gap_secs: f64,

    /// Elapsed time after which the speed multiplier starts to ramp
    pub speed_ramp_start_secs: f64,
    /// Seconds of play per +1.0 of speed multiplier once ramping
    pub speed_ramp_secs: f64,
    pub max_speed: f64,

    /// Wall-clock milliseconds per score point at speed 1.0
    pub score_interval_ms: f64,
    /// Longer frame gaps (background tab, debugger) are clamped to this
    pub max_frame_delta_ms: f64,

    pub cloud_count: usize,
    pub star_count: usize,

    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 400.0,
            ground_height: 20.0,
            player_x: 80.0,
            player_width: 60.0,
            player_height: 80.0,
            player_duck_height: 40.0,
            gravity: 0.8,
            jump_force: -16.0,
            obstacle_speed: 5.0,
            spawn_chance: 0.02,
            spawn_chance_per_point: 1.0 / 100_000.0,
            max_spawn_chance: 0.1,
            max_obstacles: 3,
            min_spawn_gap_secs: 1.0,
            speed_ramp_start_secs: 30.0,
            speed_ramp_secs: 40.0,
            max_speed: 2.5,
            score_interval_ms: 10.0,
            max_frame_delta_ms: 250.0,
            cloud_count: 5,
            star_count: 30,
            seed: 0x5EED_D1A0,
        }
    }
}

impl GameConfig {
    /// Y coordinate of the ground line (top of the ground strip)
    pub fn ground_y(&self) -> f32 {
        self.canvas_height - self.ground_height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.ground_height < 0.0 || self.ground_height >= self.canvas_height {
            return Err(ConfigError::InvalidValue(format!(
                "ground height {} does not fit a canvas of height {}",
                self.ground_height, self.canvas_height
            )));
        }
        if self.player_duck_height <= 0.0 || self.player_duck_height >= self.player_height {
            return Err(ConfigError::InvalidValue(format!(
                "duck height {} must be positive and below the normal height {}",
                self.player_duck_height, self.player_height
            )));
        }
        if self.gravity <= 0.0 || self.jump_force >= 0.0 {
            return Err(ConfigError::InvalidValue(
                "gravity must be positive and jump force negative".into(),
            ));
        }
        if self.obstacle_speed <= 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "obstacle speed must be positive, got {}",
                self.obstacle_speed
            )));
        }
        if self.score_interval_ms <= 0.0 || self.speed_ramp_secs <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "score interval and speed ramp must be positive".into(),
            ));
        }
        if self.max_speed < 1.0 {
            return Err(ConfigError::InvalidValue(format!(
                "max speed must be at least 1.0, got {}",
                self.max_speed
            )));
        }
        Ok(())
    }
}

/// Pose classifier tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    pub calibration_ms: f64,
    /// Per-pixel |dR|+|dG|+|dB| above which a pixel counts as moving
    pub motion_pixel_threshold: u32,
    /// Fraction of moving pixels above which a frame counts as motion
    pub motion_ratio_threshold: f32,
    /// Chance that a motion frame picks a new pose
    pub motion_trigger_probability: f32,
    pub seed: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            calibration_ms: 3000.0,
            motion_pixel_threshold: 30,
            motion_ratio_threshold: 0.1,
            motion_trigger_probability: 0.1,
            seed: 0xCA11_B8A7,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.calibration_ms < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "calibration delay must not be negative, got {}",
                self.calibration_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.motion_ratio_threshold)
            || !(0.0..=1.0).contains(&self.motion_trigger_probability)
        {
            return Err(ConfigError::InvalidValue(
                "motion ratio and trigger probability must lie in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration handed over by the host page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub classifier: ClassifierConfig,
    pub diagnostics: bool,
    pub high_score_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            classifier: ClassifierConfig::default(),
            diagnostics: false,
            high_score_key: "dinoHighScore".into(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a (possibly partial) JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        self.classifier.validate()?;
        if self.high_score_key.is_empty() {
            return Err(ConfigError::InvalidValue("high score key must not be empty".into()));
        }
        Ok(())
    }
}
