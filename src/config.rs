//! Game configuration
//!
//! Screen geometry, step rate and tuning constants, passed into a session
//! explicitly. Loaded from a JSON file; any field left out takes its default.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::geom::Aabb;

/// How live obstacles react to a world speed change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ObstacleSpeed {
    /// Keep the world speed sampled when the obstacle spawned
    #[default]
    Frozen,
    /// Follow the current world speed, together with the ground
    Live,
}

impl ObstacleSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleSpeed::Frozen => "Frozen",
            ObstacleSpeed::Live => "Live",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Game tuning and geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub ground_height: f32,

    // === Timing ===
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Cap on catch-up ticks per rendered frame
    pub max_ticks_per_frame: u32,

    // === Physics (per tick) ===
    pub gravity: f32,
    pub jump_impulse: f32,

    // === World speed ===
    pub base_speed: f32,
    pub speed_increment: f32,
    pub max_speed: f32,
    /// Score points between speed increments
    pub ramp_threshold: u32,
    pub obstacle_speed: ObstacleSpeed,

    // === Scoring and spawning ===
    pub score_per_tick: f32,
    pub spawn_interval_ticks: u32,
    pub cloud_speed: f32,
    pub cloud_spawn_odds: u32,
    /// Score points between day/night flips (0 disables)
    pub tint_period: u32,

    // === Session ===
    /// Restart straight into a new run instead of the title screen
    pub reset_to_playing: bool,
    /// RNG seed for cloud placement
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ground_height: GROUND_HEIGHT,

            tick_rate: REFERENCE_TICK_RATE,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,

            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,

            base_speed: BASE_SPEED,
            speed_increment: SPEED_INCREMENT,
            max_speed: MAX_SPEED,
            ramp_threshold: RAMP_THRESHOLD,
            obstacle_speed: ObstacleSpeed::Frozen,

            score_per_tick: SCORE_PER_TICK,
            spawn_interval_ticks: SPAWN_INTERVAL_TICKS,
            cloud_speed: CLOUD_SPEED,
            cloud_spawn_odds: CLOUD_SPAWN_ODDS,
            tint_period: TINT_PERIOD,

            reset_to_playing: false,
            seed: 0xD1_0D45,
        }
    }
}

impl GameConfig {
    /// Y coordinate of the ground line (player feet rest here)
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.screen_height - self.ground_height
    }

    /// Where the player stands at the start of a run
    pub fn player_spawn(&self) -> Vec2 {
        Vec2::new(PLAYER_SPAWN_X, self.ground_y())
    }

    /// Bounds of the clickable restart control on the game over screen
    pub fn restart_button(&self) -> Aabb {
        let center = Vec2::new(self.screen_width / 2.0, self.screen_height / 1.4);
        Aabb::from_center(center, Vec2::new(160.0, 30.0))
    }

    /// Duration of one tick in seconds
    pub fn tick_duration_secs(&self) -> f64 {
        1.0 / self.tick_rate.max(1) as f64
    }

    /// Re-express every per-tick quantity for a new step rate.
    ///
    /// Jump height and arc, scroll speed in px/s and score per second are
    /// preserved; only the granularity changes.
    pub fn with_tick_rate(&self, tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        let k = self.tick_rate as f32 / tick_rate as f32;

        let mut cfg = self.clone();
        cfg.tick_rate = tick_rate;
        cfg.gravity = self.gravity * k * k;
        cfg.jump_impulse = self.jump_impulse * k;
        cfg.base_speed = self.base_speed * k;
        cfg.speed_increment = self.speed_increment * k;
        cfg.max_speed = self.max_speed * k;
        cfg.cloud_speed = self.cloud_speed * k;
        cfg.score_per_tick = self.score_per_tick * k;
        cfg.spawn_interval_ticks = ((self.spawn_interval_ticks as f32 / k).round() as u32).max(1);
        cfg.cloud_spawn_odds = ((self.cloud_spawn_odds as f32 / k).round() as u32).max(1);
        cfg
    }

    /// Check the values the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return fail("screen dimensions must be positive");
        }
        if self.ground_height < 0.0 || self.ground_height >= self.screen_height {
            return fail("ground_height must lie within the screen");
        }
        if self.tick_rate == 0 {
            return fail("tick_rate must be at least 1");
        }
        if self.gravity <= 0.0 {
            return fail("gravity must be positive");
        }
        if self.jump_impulse >= 0.0 {
            return fail("jump_impulse must be negative (upward)");
        }
        if self.base_speed <= 0.0 || self.max_speed < self.base_speed {
            return fail("speeds must satisfy 0 < base_speed <= max_speed");
        }
        // Ground segments only tile when they move at most one width per tick
        if self.max_speed > self.screen_width {
            return fail("max_speed must not exceed screen_width");
        }
        if self.ramp_threshold == 0 {
            return fail("ramp_threshold must be at least 1");
        }
        if self.spawn_interval_ticks == 0 || self.cloud_spawn_odds == 0 {
            return fail("spawn intervals must be at least 1");
        }
        Ok(())
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let cfg: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
        cfg.validate()?;

        log::info!(
            "Loaded config from {} ({} Hz, obstacles {})",
            path.display(),
            cfg.tick_rate,
            cfg.obstacle_speed.as_str()
        );
        Ok(cfg)
    }
}
