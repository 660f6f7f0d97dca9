//! Game session - state machine and the per-frame simulation step
//!
//! `step()` runs once per animation frame while playing, in a fixed order:
//! player physics, obstacle advance, background drift, spawn, collision,
//! score and speed. Control commands arrive between steps and are ignored
//! unless the game is playing.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::background::Background;
use super::high_score::HighScoreStore;
use super::obstacle::{spawn_allowed, spawn_chance, Obstacle, ObstacleKind, OBSTACLE_KINDS};
use super::player::Player;
use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Idle,
    Playing,
    Paused,
    GameOver,
}

impl GameState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Idle => "idle",
            GameState::Playing => "playing",
            GameState::Paused => "paused",
            GameState::GameOver => "gameOver",
        }
    }
}

/// Read-only snapshot of the session counters, for the HUD
#[derive(Clone, Debug, PartialEq)]
pub struct SessionStats {
    pub state: GameState,
    pub score: u32,
    pub high_score: u32,
    pub new_high_score: bool,
    pub speed: f64,
    pub elapsed_secs: f64,
    pub obstacles_avoided: u32,
}

pub struct DinoGame {
    config: GameConfig,
    state: GameState,

    score: f64,
    /// Milliseconds not yet converted into score points
    score_carry_ms: f64,
    speed: f64,
    elapsed_secs: f64,
    obstacles_avoided: u32,
    high_score: u32,
    new_high_score: bool,

    player: Player,
    obstacles: Vec<Obstacle>,
    background: Background,
    last_spawn_secs: f64,

    rng: SmallRng,
    store: Box<dyn HighScoreStore>,
}

impl DinoGame {
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Self {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let background = Background::new(&config, &mut rng);
        let high_score = match store.load() {
            Ok(stored) => stored.unwrap_or(0),
            Err(e) => {
                log::warn!("{}; starting with high score 0", e);
                0
            }
        };

        Self {
            player: Player::new(&config),
            config,
            state: GameState::Idle,
            score: 0.0,
            score_carry_ms: 0.0,
            speed: 1.0,
            elapsed_secs: 0.0,
            obstacles_avoided: 0,
            high_score,
            new_high_score: false,
            obstacles: Vec::new(),
            background,
            last_spawn_secs: 0.0,
            rng,
            store,
        }
    }

    // ------------------------------------------------------------------
    // State machine
    // ------------------------------------------------------------------

    /// Start a fresh run. Ignored while already playing.
    pub fn start(&mut self) {
        if self.state == GameState::Playing {
            return;
        }
        self.reset_run();
        self.state = GameState::Playing;
        log::info!("Game started (high score {})", self.high_score);
    }

    /// Playing <-> Paused; other states are left alone
    pub fn toggle_pause(&mut self) -> GameState {
        self.state = match self.state {
            GameState::Playing => {
                log::info!("Game paused");
                GameState::Paused
            }
            GameState::Paused => {
                log::info!("Game resumed");
                GameState::Playing
            }
            other => other,
        };
        self.state
    }

    /// Back to idle defaults; the high score survives
    pub fn reset(&mut self) {
        self.reset_run();
        self.state = GameState::Idle;
        log::info!("Game reset");
    }

    fn reset_run(&mut self) {
        self.score = 0.0;
        self.score_carry_ms = 0.0;
        self.speed = 1.0;
        self.elapsed_secs = 0.0;
        self.obstacles_avoided = 0;
        self.new_high_score = false;
        self.obstacles.clear();
        self.last_spawn_secs = 0.0;
        self.player.reset();
    }

    fn game_over(&mut self) {
        self.state = GameState::GameOver;
        let final_score = self.score();

        if final_score > self.high_score {
            self.high_score = final_score;
            self.new_high_score = true;
            if let Err(e) = self.store.save(final_score) {
                log::warn!("{}", e);
            }
            log::info!("Game over, new high score {}", final_score);
        } else {
            log::info!("Game over, score {}", final_score);
        }
    }

    // ------------------------------------------------------------------
    // Simulation step
    // ------------------------------------------------------------------

    /// Advance one animation frame by `delta_ms` of wall-clock time
    pub fn step(&mut self, delta_ms: f64) {
        if self.state != GameState::Playing {
            return;
        }
        let delta_ms = delta_ms.clamp(0.0, self.config.max_frame_delta_ms);
        self.elapsed_secs += delta_ms / 1000.0;

        self.player.step(self.config.gravity);
        self.advance_obstacles();
        self.background.advance(self.speed, &mut self.rng);
        self.maybe_spawn();

        if self.detect_collision() {
            self.game_over();
            return;
        }

        self.update_score(delta_ms);
    }

    fn advance_obstacles(&mut self) {
        let shift = self.config.obstacle_speed * self.speed as f32;
        for obstacle in &mut self.obstacles {
            obstacle.x -= shift;
        }

        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_off_screen());
        self.obstacles_avoided += (before - self.obstacles.len()) as u32;
    }

    fn maybe_spawn(&mut self) {
        let roll: f32 = self.rng.gen();
        if roll >= spawn_chance(&self.config, self.score) {
            return;
        }
        if !spawn_allowed(&self.config, self.obstacles.len(), self.elapsed_secs, self.last_spawn_secs) {
            return;
        }

        let kind = ObstacleKind::from_index(self.rng.gen_range(0..OBSTACLE_KINDS.len()));
        let obstacle = Obstacle::spawn(kind, &self.config, self.rng.gen());
        log::debug!("Spawned {} at t={:.2}s", kind.as_str(), self.elapsed_secs);
        self.obstacles.push(obstacle);
        self.last_spawn_secs = self.elapsed_secs;
    }

    fn detect_collision(&self) -> bool {
        let player = self.player.bounds();
        self.obstacles.iter().any(|o| player.overlaps(&o.bounds()))
    }

    /// One point per `score_interval_ms`, scaled by speed. The sub-interval
    /// remainder carries into the next frame rather than being floored away,
    /// so frame rate does not change the score earned per second.
    fn update_score(&mut self, delta_ms: f64) {
        self.score_carry_ms += delta_ms;
        let points = (self.score_carry_ms / self.config.score_interval_ms).floor();
        self.score_carry_ms -= points * self.config.score_interval_ms;
        self.score += points * self.speed;

        if self.elapsed_secs > self.config.speed_ramp_start_secs && self.speed < self.config.max_speed {
            self.speed = (1.0 + self.elapsed_secs / self.config.speed_ramp_secs).min(self.config.max_speed);
        }
    }

    // ------------------------------------------------------------------
    // Control commands
    // ------------------------------------------------------------------

    /// Jump; ignored unless playing and on the ground
    pub fn jump(&mut self) -> bool {
        self.state == GameState::Playing && self.player.jump(self.config.jump_force)
    }

    /// Duck; ignored unless playing and on the ground
    pub fn begin_duck(&mut self) -> bool {
        self.state == GameState::Playing && self.player.begin_duck()
    }

    /// Stand back up; ignored unless playing
    pub fn end_duck(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.player.end_duck();
        true
    }

    /// Place an obstacle directly, bypassing the spawner
    pub fn push_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    // ------------------------------------------------------------------
    // Read-only queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Whole points scored this run
    pub fn score(&self) -> u32 {
        self.score.floor() as u32
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn obstacles_avoided(&self) -> u32 {
        self.obstacles_avoided
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            state: self.state,
            score: self.score(),
            high_score: self.high_score,
            new_high_score: self.new_high_score,
            speed: self.speed,
            elapsed_secs: self.elapsed_secs,
            obstacles_avoided: self.obstacles_avoided,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::high_score::MemoryStore;

    fn quiet_config() -> GameConfig {
        GameConfig {
            spawn_chance: 0.0,
            spawn_chance_per_point: 0.0,
            ..Default::default()
        }
    }

    fn quiet_game() -> DinoGame {
        DinoGame::new(quiet_config(), Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_state_machine() {
        let mut game = quiet_game();
        assert_eq!(game.state(), GameState::Idle);
        assert_eq!(game.toggle_pause(), GameState::Idle);
        game.start();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.toggle_pause(), GameState::Paused);
        assert_eq!(game.toggle_pause(), GameState::Playing);
        game.reset();
        assert_eq!(game.state(), GameState::Idle);
    }

    #[test]
    fn test_paused_game_does_not_advance() {
        let mut game = quiet_game();
        game.start();
        game.step(16.0);
        let elapsed = game.elapsed_secs();
        let score = game.score();
        game.toggle_pause();
        for _ in 0..100 {
            game.step(16.0);
        }
        assert_eq!(game.elapsed_secs(), elapsed);
        assert_eq!(game.score(), score);
    }

    #[test]
    fn test_commands_ignored_unless_playing() {
        let mut game = quiet_game();
        assert!(!game.jump());
        assert!(!game.begin_duck());
        assert!(!game.end_duck());
        assert!(!game.player().is_jumping);

        game.start();
        game.toggle_pause();
        assert!(!game.jump());
        assert!(!game.player().is_jumping);
    }

    #[test]
    fn test_score_uses_carry() {
        let mut game = quiet_game();
        game.start();
        for _ in 0..62 {
            game.step(16.0);
        }
        // 992ms at one point per 10ms
        assert_eq!(game.score(), 99);
        assert_eq!(game.speed(), 1.0);
    }

    #[test]
    fn test_score_remainder_is_not_floored_away() {
        let mut game = quiet_game();
        game.start();
        // Flooring each 15ms frame would give 1 + 1
        game.step(15.0);
        game.step(15.0);
        assert_eq!(game.score(), 3);
    }

    #[test]
    fn test_speed_ramps_after_threshold_and_caps() {
        let mut game = quiet_game();
        game.start();
        for _ in 0..(29_000 / 100) {
            game.step(100.0);
        }
        assert_eq!(game.speed(), 1.0);
        for _ in 0..(2_000 / 100) {
            game.step(100.0);
        }
        assert!(game.speed() > 1.7 && game.speed() < 1.8);
        for _ in 0..(60_000 / 100) {
            game.step(100.0);
        }
        assert_eq!(game.speed(), 2.5);
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut game = quiet_game();
        game.start();
        game.step(10_000.0);
        assert_eq!(game.elapsed_secs(), 0.25);
        assert_eq!(game.score(), 25);
        game.step(-50.0);
        assert_eq!(game.elapsed_secs(), 0.25);
    }

    #[test]
    fn test_obstacle_removed_once_and_counted() {
        let mut game = quiet_game();
        game.start();
        game.push_obstacle(Obstacle::new(ObstacleKind::Rock, 3.0, 330.0, 40.0, 50.0));
        let mut last_x = 3.0;
        let mut steps = 0;
        while !game.obstacles().is_empty() {
            game.step(16.0);
            if let Some(o) = game.obstacles().first() {
                assert!(o.x < last_x);
                last_x = o.x;
            }
            steps += 1;
            assert!(steps < 20);
        }
        assert_eq!(game.obstacles_avoided(), 1);
        game.step(16.0);
        assert_eq!(game.obstacles_avoided(), 1);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_spawner_respects_cap_and_gap() {
        let config = GameConfig {
            spawn_chance: 1.0,
            max_spawn_chance: 1.0,
            // Obstacles never reach the player within the test window
            obstacle_speed: 0.5,
            ..Default::default()
        };
        let mut game = DinoGame::new(config, Box::new(MemoryStore::new()));
        game.start();

        let mut spawn_times = Vec::new();
        let mut live = 0;
        for _ in 0..(8_000 / 16) {
            game.step(16.0);
            assert!(game.obstacles().len() <= 3);
            if game.obstacles().len() > live {
                spawn_times.push(game.elapsed_secs());
            }
            live = game.obstacles().len();
        }
        assert_eq!(live, 3);
        assert_eq!(spawn_times.len(), 3);
        assert!(spawn_times[0] > 1.0);
        assert!(spawn_times.windows(2).all(|w| w[1] - w[0] > 1.0));
    }

    #[test]
    fn test_high_score_persists_across_reset() {
        let store = MemoryStore::with_score(10);
        let mut game = DinoGame::new(quiet_config(), Box::new(store.clone()));
        assert_eq!(game.high_score(), 10);

        game.start();
        for _ in 0..50 {
            game.step(16.0);
        }
        let final_score = game.score();
        assert!(final_score > 10);
        game.push_obstacle(Obstacle::new(ObstacleKind::Rock, 100.0, 330.0, 40.0, 50.0));
        game.step(16.0);
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.high_score(), final_score);
        assert!(game.stats().new_high_score);
        assert_eq!(store.get(), Some(final_score));

        game.reset();
        assert_eq!(game.high_score(), final_score);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let store = MemoryStore::with_score(5000);
        let mut game = DinoGame::new(quiet_config(), Box::new(store.clone()));
        game.start();
        game.step(16.0);
        game.push_obstacle(Obstacle::new(ObstacleKind::Rock, 100.0, 330.0, 40.0, 50.0));
        game.step(16.0);
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.high_score(), 5000);
        assert!(!game.stats().new_high_score);
        assert_eq!(store.get(), Some(5000));
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut game = quiet_game();
        game.start();
        game.push_obstacle(Obstacle::new(ObstacleKind::Rock, 100.0, 330.0, 40.0, 50.0));
        game.step(16.0);
        assert_eq!(game.state(), GameState::GameOver);
        game.start();
        assert_eq!(game.state(), GameState::Playing);
        assert!(game.obstacles().is_empty());
        assert_eq!(game.elapsed_secs(), 0.0);
    }
}
