//! Game simulation
//!
//! Pure state and logic: no browser APIs. The per-frame entry point is
//! `DinoGame::step`; rendering reads the session through its getters.

mod aabb;
mod background;
mod high_score;
mod obstacle;
mod player;
mod session;

pub use aabb::Aabb;
pub use background::{Background, Cloud, Star};
pub use high_score::{parse_stored_score, HighScoreStore, MemoryStore, StorageError};
pub use obstacle::{spawn_allowed, spawn_chance, Obstacle, ObstacleKind, OBSTACLE_KINDS};
pub use player::Player;
pub use session::{DinoGame, GameState, SessionStats};
