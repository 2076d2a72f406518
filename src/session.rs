//! Game session: one player, one store, one run at a time
//!
//! Each frame is a strict sequence over explicit values:
//! input → `apply_input` → `tick` → game over commit → render snapshot.
//! Nothing here touches a terminal or window, so whole runs can be stepped
//! headless.

use crate::config::GameConfig;
use crate::persistence::{ScoreGateway, ScoreStore};
use crate::sim::{GameEvent, GameState, InputEvent, RenderSnapshot, TickInput, tick};

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f64,
    accumulator: f64,
    max_ticks: u32,
}

impl FixedStep {
    pub fn new(tick_rate: u32, max_ticks: u32) -> Self {
        Self {
            dt: 1.0 / tick_rate.max(1) as f64,
            accumulator: 0.0,
            max_ticks: max_ticks.max(1),
        }
    }

    /// Add `elapsed` seconds of wall time and return how many ticks to run.
    /// Time beyond `max_ticks` is dropped so a long stall cannot snowball.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        // Clamp huge frame gaps (debugger, suspended terminal)
        self.accumulator += elapsed.clamp(0.0, 0.25);

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_ticks {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        if ticks == self.max_ticks {
            self.accumulator = self.accumulator.min(self.dt);
        }
        ticks
    }
}

pub struct GameSession<S> {
    state: GameState,
    gateway: ScoreGateway<S>,
    clock: FixedStep,
}

impl<S: ScoreStore> GameSession<S> {
    pub fn new(config: GameConfig, mut gateway: ScoreGateway<S>) -> Self {
        let best = gateway.best();
        log::info!("Session for '{}' starting, best score {}", gateway.key(), best);
        let clock = FixedStep::new(config.tick_rate, config.max_ticks_per_frame);
        Self {
            state: GameState::new(config, best),
            gateway,
            clock,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn gateway(&self) -> &ScoreGateway<S> {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut ScoreGateway<S> {
        &mut self.gateway
    }

    pub fn should_quit(&self) -> bool {
        self.state.quit_requested
    }

    /// Run exactly one simulation tick and settle its side effects
    pub fn step_input(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, input);
        let events = self.state.drain_events();
        for event in &events {
            self.handle_event(event);
        }
        events
    }

    /// One tick from a batch of discrete inputs, returning the frame to draw
    pub fn step<I>(&mut self, inputs: I) -> RenderSnapshot
    where
        I: IntoIterator<Item = InputEvent>,
    {
        self.step_input(&TickInput::from_events(inputs));
        self.snapshot()
    }

    /// Feed wall-clock time and run however many ticks are due. `pending`
    /// is consumed by the first tick; with no tick due it waits for the next
    /// frame. Returns the number of ticks run.
    pub fn frame(&mut self, elapsed_secs: f64, pending: &mut TickInput) -> u32 {
        let due = self.clock.advance(elapsed_secs);
        let mut ran = 0;
        for _ in 0..due {
            let input = std::mem::take(pending);
            self.step_input(&input);
            ran += 1;
            if self.should_quit() {
                break;
            }
        }
        // Quit is observed without a tick; the rest of `pending` waits for one
        if due == 0 && pending.quit {
            pending.quit = false;
            let quit = TickInput {
                quit: true,
                ..Default::default()
            };
            crate::sim::apply_input(&mut self.state, &quit);
        }
        ran
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state)
    }

    fn handle_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::GameOver { score } => match self.gateway.maybe_commit(score) {
                Ok(outcome) => {
                    self.state.best_score = self.state.best_score.max(outcome.best());
                }
                Err(e) => {
                    // Best effort: the run is over either way
                    log::error!("Failed to save best score {}: {}", score, e);
                }
            },
            GameEvent::RunStarted => log::info!("Run started"),
            GameEvent::Reset => log::info!("Run reset"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{DEFAULT_KEY, MemoryStore};
    use crate::sim::GamePhase;

    #[test]
    fn test_fixed_step_counts_ticks() {
        let mut clock = FixedStep::new(60, 5);
        assert_eq!(clock.advance(1.0 / 120.0), 0);
        assert_eq!(clock.advance(1.0 / 120.0 + 1e-9), 1);
        assert_eq!(clock.advance(3.0 / 60.0 + 1e-9), 3);
    }

    #[test]
    fn test_fixed_step_caps_catch_up() {
        let mut clock = FixedStep::new(60, 5);
        assert_eq!(clock.advance(10.0), 5);
        // The backlog was dropped, not carried
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_pending_input_waits_for_a_tick() {
        let mut session = GameSession::new(
            GameConfig::default(),
            ScoreGateway::new(MemoryStore::new(), DEFAULT_KEY),
        );
        let mut pending = TickInput::from_events([InputEvent::Primary]);

        assert_eq!(session.frame(0.001, &mut pending), 0);
        assert!(pending.primary);
        assert_eq!(session.state().phase, GamePhase::Start);

        assert!(session.frame(1.0 / 60.0, &mut pending) >= 1);
        assert!(!pending.primary);
        assert_eq!(session.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_quit_is_observed_without_a_tick() {
        let mut session = GameSession::new(
            GameConfig::default(),
            ScoreGateway::new(MemoryStore::new(), DEFAULT_KEY),
        );
        let mut pending = TickInput::from_events([InputEvent::Quit]);
        session.frame(0.0, &mut pending);
        assert!(session.should_quit());
    }

    #[test]
    fn test_quit_without_a_tick_leaves_other_input_pending() {
        let mut session = GameSession::new(
            GameConfig::default(),
            ScoreGateway::new(MemoryStore::new(), DEFAULT_KEY),
        );
        let mut pending = TickInput::from_events([InputEvent::Primary, InputEvent::Quit]);

        assert_eq!(session.frame(0.0, &mut pending), 0);
        assert!(session.should_quit());
        assert_eq!(session.state().phase, GamePhase::Start);
        assert!(pending.primary);
        assert!(!pending.quit);
    }

    #[test]
    fn test_best_loaded_at_start() {
        let session = GameSession::new(
            GameConfig::default(),
            ScoreGateway::new(MemoryStore::with_score(DEFAULT_KEY, 77), DEFAULT_KEY),
        );
        assert_eq!(session.state().best_score, 77);
        assert!(session.snapshot().banner.contains(&"High Score: 77".to_string()));
    }
}
