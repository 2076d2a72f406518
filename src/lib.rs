//! Dino Dash - A side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `session`: Frame driver tying input, simulation and persistence together
//! - `persistence`: Best-score stores with read-repair
//! - `highscores`: Per-player leaderboard
//! - `config`: Data-driven game tuning
//! - `platform` / `renderer`: Native terminal front end

pub mod config;
pub mod highscores;
pub mod persistence;
#[cfg(not(target_arch = "wasm32"))]
pub mod platform;
#[cfg(not(target_arch = "wasm32"))]
pub mod renderer;
pub mod session;
pub mod sim;

pub use config::{ConfigError, GameConfig, ObstacleSpeed};
pub use highscores::{Leaderboard, LeaderboardFile};
pub use persistence::{MemoryStore, ScoreGateway, ScoreStore, StoreError};
pub use session::GameSession;

/// Reference tuning, calibrated against a 60 Hz fixed step.
///
/// `GameConfig::with_tick_rate` rescales these for other step rates.
pub mod consts {
    /// Reference simulation rate (ticks per second)
    pub const REFERENCE_TICK_RATE: u32 = 60;

    /// Logical screen dimensions
    pub const SCREEN_WIDTH: f32 = 600.0;
    pub const SCREEN_HEIGHT: f32 = 300.0;
    /// Height of the ground strip; the ground line sits this far above the bottom
    pub const GROUND_HEIGHT: f32 = 30.0;

    /// Downward acceleration (px/tick²)
    pub const GRAVITY: f32 = 0.5;
    /// Vertical velocity applied by a jump (px/tick, negative is up)
    pub const JUMP_IMPULSE: f32 = -12.0;

    /// Player sprite size and spawn column
    pub const PLAYER_WIDTH: f32 = 44.0;
    pub const PLAYER_HEIGHT: f32 = 47.0;
    pub const PLAYER_SPAWN_X: f32 = 50.0;
    /// Frames in the run cycle and ticks each frame is shown
    pub const RUN_FRAMES: u8 = 5;
    pub const TICKS_PER_RUN_FRAME: u32 = 6;

    /// Obstacle (cactus) size and spawn gap past the right edge
    pub const OBSTACLE_WIDTH: f32 = 40.0;
    pub const OBSTACLE_HEIGHT: f32 = 40.0;
    pub const OBSTACLE_SPAWN_GAP: f32 = 10.0;

    /// Cloud size, drift speed and spawn band
    pub const CLOUD_WIDTH: f32 = 90.0;
    pub const CLOUD_HEIGHT: f32 = 30.0;
    pub const CLOUD_SPEED: f32 = 1.0;
    pub const CLOUD_MIN_Y: f32 = 30.0;
    /// One-in-N chance per playing tick of spawning a cloud
    pub const CLOUD_SPAWN_ODDS: u32 = 120;

    /// World speed ramp
    pub const BASE_SPEED: f32 = 5.0;
    pub const SPEED_INCREMENT: f32 = 0.5;
    pub const MAX_SPEED: f32 = 20.0;
    pub const RAMP_THRESHOLD: u32 = 50;

    /// Score gained per playing tick
    pub const SCORE_PER_TICK: f32 = 0.1;
    /// Ticks between obstacle spawns
    pub const SPAWN_INTERVAL_TICKS: u32 = 91;
    /// Score points between day/night flips (0 disables)
    pub const TINT_PERIOD: u32 = 100;

    /// Maximum simulation ticks run per rendered frame
    pub const MAX_TICKS_PER_FRAME: u32 = 5;
}
