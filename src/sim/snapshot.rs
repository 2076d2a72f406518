//! Render snapshot
//!
//! A plain value describing everything the render sink needs for one frame.
//! Taken after the tick, so it always reflects post-collision state.

use serde::Serialize;

use super::difficulty::Tint;
use super::entities::Sprite;
use super::geom::Aabb;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub tint: Tint,
    pub screen_width: f32,
    pub screen_height: f32,
    pub player: Aabb,
    /// Run-cycle sprite index
    pub player_frame: u8,
    pub player_airborne: bool,
    pub ground: [Aabb; 2],
    pub obstacles: Vec<Aabb>,
    pub decorations: Vec<Aabb>,
    pub score: u64,
    pub best_score: u64,
    /// Centered banner lines for the current phase (empty while playing)
    pub banner: Vec<String>,
    /// Clickable restart control, only on the game over screen
    pub restart_button: Option<Aabb>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let world = &state.world;
        let score = state.score();
        let best = state.best_score;

        let banner = match state.phase {
            GamePhase::Start => vec![
                "Dino Run".to_string(),
                "Press SPACE to Start".to_string(),
                format!("High Score: {}", best),
            ],
            GamePhase::Playing => Vec::new(),
            GamePhase::Paused => vec![
                "Game Paused".to_string(),
                "Press P to Resume".to_string(),
            ],
            GamePhase::GameOver => vec![
                "Game Over".to_string(),
                format!("Score: {}", score),
                format!("High Score: {}", best),
                "Press R to Restart".to_string(),
            ],
        };

        Self {
            phase: state.phase,
            tint: world.run.tint,
            screen_width: state.config.screen_width,
            screen_height: state.config.screen_height,
            player: world.player.bounds(),
            player_frame: world.player.frame,
            player_airborne: world.player.airborne,
            ground: world.ground.segments(),
            obstacles: world.entities.obstacle_bounds().collect(),
            decorations: world.entities.decorations.iter().map(Sprite::bounds).collect(),
            score,
            best_score: best,
            banner,
            restart_button: (state.phase == GamePhase::GameOver)
                .then(|| state.config.restart_button()),
        }
    }

    /// HUD line shown in the corner while a run is on screen
    pub fn hud(&self) -> String {
        format!("Score: {}  Best: {}", self.score, self.best_score)
    }
}
