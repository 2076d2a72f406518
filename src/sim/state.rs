//! Game state and core simulation types
//!
//! `World` holds everything that belongs to a single run and is rebuilt
//! wholesale on reset. `GameState` wraps it with the phase machine, the best
//! score shown on the HUD, the RNG and the event queue.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Player;
use super::difficulty::RunState;
use super::entities::ScrollingSet;
use super::ground::GroundStrip;
use crate::config::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start input
    Start,
    /// Active gameplay
    Playing,
    /// Simulation frozen, only reachable from Playing
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Notable things that happened during a tick, drained by the session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted,
    Jumped,
    Paused,
    Resumed,
    SpeedUp { speed: f32 },
    ObstacleSpawned { id: u32 },
    /// Emitted once per run, on the tick the collision happened
    GameOver { score: u64 },
    Reset,
}

/// Everything owned by a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub player: Player,
    pub entities: ScrollingSet,
    pub ground: GroundStrip,
    pub run: RunState,
}

impl World {
    pub fn new(cfg: &GameConfig) -> Self {
        Self {
            player: Player::new(cfg.player_spawn(), cfg.gravity, cfg.jump_impulse),
            entities: ScrollingSet::new(cfg.screen_width, cfg.ground_y()),
            ground: GroundStrip::new(
                cfg.screen_width,
                cfg.ground_y(),
                cfg.ground_height,
                cfg.base_speed,
            ),
            run: RunState::new(cfg),
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: GamePhase,
    pub world: World,
    /// Best score known to this process (persisted copy lives in the store)
    pub best_score: u64,
    /// Set once a quit input arrives; the driver stops at the tick boundary
    pub quit_requested: bool,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(config: GameConfig, best_score: u64) -> Self {
        let world = World::new(&config);
        let rng = Pcg32::seed_from_u64(config.seed);
        Self {
            config,
            phase: GamePhase::Start,
            world,
            best_score,
            quit_requested: false,
            rng,
            events: Vec::new(),
        }
    }

    /// Move to a new phase, logging the transition
    pub(crate) fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {} -> {}", self.phase.as_str(), phase.as_str());
            self.phase = phase;
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Throw away the current run and start over. The best score survives.
    pub fn reset(&mut self) {
        self.world = World::new(&self.config);
        self.push_event(GameEvent::Reset);

        if self.config.reset_to_playing {
            self.set_phase(GamePhase::Playing);
            self.push_event(GameEvent::RunStarted);
        } else {
            self.set_phase(GamePhase::Start);
        }
    }

    /// Whole score of the current run
    pub fn score(&self) -> u64 {
        self.world.run.whole_score()
    }
}
