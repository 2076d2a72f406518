//! Difficulty ramp and per-run counters
//!
//! Score grows by a fixed amount per playing tick, independent of speed.
//! Each time its integer part crosses a multiple of the ramp threshold the
//! world speed steps up, capped at the configured maximum. The obstacle
//! spawn countdown and the day/night tint live here too.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Background tint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Tint {
    #[default]
    Day,
    Night,
}

/// What changed during one ramp step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RampStep {
    /// World speed increased this tick
    pub speed_changed: bool,
    /// Spawn countdown expired this tick
    pub spawn_obstacle: bool,
    /// Tint flipped this tick
    pub tint_changed: bool,
}

/// Per-run scalar state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Elapsed survival score, derived from `ticks`
    pub score: f64,
    /// Current world speed (px/tick)
    pub speed: f32,
    /// Ticks until the next obstacle spawn
    pub spawn_timer: u32,
    pub tint: Tint,
    /// Playing ticks elapsed this run
    pub ticks: u64,
    /// Next whole score at which speed steps up
    next_step_at: u32,
}

impl RunState {
    pub fn new(cfg: &GameConfig) -> Self {
        Self {
            score: 0.0,
            speed: cfg.base_speed,
            spawn_timer: cfg.spawn_interval_ticks,
            tint: Tint::Day,
            ticks: 0,
            next_step_at: cfg.ramp_threshold,
        }
    }

    /// Whole score as shown on the HUD and committed to storage
    #[inline]
    pub fn whole_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Advance the ramp by one playing tick
    pub fn advance(&mut self, cfg: &GameConfig) -> RampStep {
        let mut step = RampStep::default();

        self.ticks += 1;
        // Recomputed rather than summed so long runs keep full precision
        self.score = self.ticks as f64 * cfg.score_per_tick as f64;
        let whole = self.whole_score();

        while whole >= self.next_step_at as u64 {
            if self.speed < cfg.max_speed {
                self.speed = (self.speed + cfg.speed_increment).min(cfg.max_speed);
                step.speed_changed = true;
            }
            self.next_step_at = self.next_step_at.saturating_add(cfg.ramp_threshold);
        }

        self.spawn_timer = self.spawn_timer.saturating_sub(1);
        if self.spawn_timer == 0 {
            step.spawn_obstacle = true;
            self.spawn_timer = cfg.spawn_interval_ticks;
        }

        let tint = tint_for(whole, cfg.tint_period);
        if tint != self.tint {
            self.tint = tint;
            step.tint_changed = true;
        }

        step
    }
}

fn tint_for(whole_score: u64, period: u32) -> Tint {
    if period == 0 {
        return Tint::Day;
    }
    if (whole_score / period as u64) % 2 == 1 {
        Tint::Night
    } else {
        Tint::Day
    }
}
