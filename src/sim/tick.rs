//! Fixed timestep simulation tick
//!
//! Each tick first applies the frame's input to the phase machine, then, only
//! while playing, moves everything, runs the ramp, spawns, and finally checks
//! collisions against post-motion positions.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::entities::Sprite;
use super::state::{GameEvent, GamePhase, GameState};
use crate::config::ObstacleSpeed;
use crate::consts::CLOUD_MIN_Y;

/// A discrete input, as produced by the platform layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Start on the title screen, jump while playing
    Primary,
    TogglePause,
    Restart,
    /// Pointer click in screen coordinates
    Click { x: f32, y: f32 },
    Quit,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start / jump (space, up arrow)
    pub primary: bool,
    /// Pause toggle
    pub pause: bool,
    /// Restart key
    pub restart: bool,
    /// Last pointer click this tick
    pub click: Option<Vec2>,
    /// Leave the game
    pub quit: bool,
}

impl TickInput {
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::Primary => self.primary = true,
            InputEvent::TogglePause => self.pause = true,
            InputEvent::Restart => self.restart = true,
            InputEvent::Click { x, y } => self.click = Some(Vec2::new(x, y)),
            InputEvent::Quit => self.quit = true,
        }
    }

    pub fn from_events<I: IntoIterator<Item = InputEvent>>(events: I) -> Self {
        let mut input = Self::default();
        for event in events {
            input.push(event);
        }
        input
    }
}

/// Apply one tick's input to the phase machine.
///
/// Inputs that make no sense in the current phase (jumping while paused,
/// restarting mid-run) are ignored.
pub fn apply_input(state: &mut GameState, input: &TickInput) {
    if input.quit && !state.quit_requested {
        log::info!("Quit requested");
        state.quit_requested = true;
    }

    match state.phase {
        GamePhase::Start => {
            if input.primary {
                state.set_phase(GamePhase::Playing);
                state.push_event(GameEvent::RunStarted);
            }
        }
        GamePhase::Playing => {
            if input.pause {
                state.set_phase(GamePhase::Paused);
                state.push_event(GameEvent::Paused);
            } else if input.primary && !state.world.player.airborne {
                state.world.player.jump();
                state.push_event(GameEvent::Jumped);
            }
        }
        GamePhase::Paused => {
            if input.pause {
                state.set_phase(GamePhase::Playing);
                state.push_event(GameEvent::Resumed);
            }
        }
        GamePhase::GameOver => {
            let button = state.config.restart_button();
            let clicked = input.click.is_some_and(|p| button.contains_point(p));
            if input.restart || clicked {
                state.reset();
            }
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    apply_input(state, input);

    // Nothing moves, spawns or scores outside of Playing
    if state.phase != GamePhase::Playing {
        return;
    }

    let cfg = &state.config;
    let world = &mut state.world;

    // Movement
    world.player.tick();
    world.entities.tick_all();
    world.ground.tick();

    // Ramp, score and spawn countdown
    let step = world.run.advance(cfg);
    let speed = world.run.speed;
    let mut events = Vec::new();

    if step.speed_changed {
        world.ground.set_speed(speed);
        if cfg.obstacle_speed == ObstacleSpeed::Live {
            world.entities.set_obstacle_speed(speed);
        }
        log::debug!("World speed -> {:.2} at score {}", speed, world.run.whole_score());
        events.push(GameEvent::SpeedUp { speed });
    }

    if step.spawn_obstacle {
        let id = world.entities.spawn_obstacle(speed);
        events.push(GameEvent::ObstacleSpawned { id });
    }

    if state.rng.random_range(0..cfg.cloud_spawn_odds) == 0 {
        let max_y = (cfg.screen_height / 2.0).max(CLOUD_MIN_Y + 1.0);
        let y = state.rng.random_range(CLOUD_MIN_Y..max_y).floor();
        world.entities.spawn_decoration(y, cfg.cloud_speed);
    }

    // Collision on post-motion positions
    let hit = collision::check(&world.player.bounds(), world.entities.obstacle_bounds());

    for event in events {
        state.push_event(event);
    }

    if hit {
        let score = state.score();
        log::info!("Game over at score {} (best {})", score, state.best_score);
        state.best_score = state.best_score.max(score);
        state.set_phase(GamePhase::GameOver);
        state.push_event(GameEvent::GameOver { score });
    }
}
