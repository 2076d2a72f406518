use dino_dash::consts::*;
use dino_dash::persistence::{DEFAULT_KEY, FileStore, MemoryStore, ScoreStore};
use dino_dash::sim::{GameEvent, GamePhase, InputEvent};
use dino_dash::{GameConfig, GameSession, ScoreGateway};

const IDLE: [InputEvent; 0] = [];

/// No obstacles spawn on their own; clouds still drift by
fn clear_path_config() -> GameConfig {
    GameConfig {
        spawn_interval_ticks: u32::MAX,
        ..Default::default()
    }
}

fn force_collision<S: ScoreStore>(session: &mut GameSession<S>) {
    let entities = &mut session.state_mut().world.entities;
    let id = entities.spawn_obstacle(0.0);
    let obstacle = entities.obstacles.iter_mut().find(|o| o.id == id).unwrap();
    obstacle.pos.x = PLAYER_SPAWN_X;
}

#[test]
fn full_run_scores_commits_and_resets() {
    let gateway = ScoreGateway::new(MemoryStore::with_score(DEFAULT_KEY, 40), DEFAULT_KEY);
    let mut session = GameSession::new(clear_path_config(), gateway);
    assert_eq!(session.state().phase, GamePhase::Start);

    // The start tick is the first of 900 playing ticks
    let snap = session.step([InputEvent::Primary]);
    assert_eq!(snap.phase, GamePhase::Playing);
    for _ in 0..899 {
        session.step(IDLE);
    }

    let state = session.state();
    assert_eq!(state.phase, GamePhase::Playing);
    assert!((state.world.run.score - 90.0).abs() < 0.05, "score {}", state.world.run.score);
    assert_eq!(state.world.run.ticks, 900);
    // Crossed 50 once
    assert_eq!(state.world.run.speed, BASE_SPEED + SPEED_INCREMENT);

    force_collision(&mut session);
    let snap = session.step(IDLE);
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(snap.best_score, 90);
    assert!(snap.banner.contains(&"Score: 90".to_string()));
    assert_eq!(session.gateway().store().writes, 1);

    // Lingering on the game over screen does not write again
    for _ in 0..60 {
        session.step([InputEvent::Primary]);
    }
    assert_eq!(session.gateway().store().writes, 1);
    assert_eq!(session.gateway_mut().best(), 90);

    // Restart wipes the run, keeps the best
    let snap = session.step([InputEvent::Restart]);
    assert_eq!(snap.phase, GamePhase::Start);
    let state = session.state();
    assert_eq!(state.world.run.score, 0.0);
    assert!(state.world.entities.is_empty());
    assert_eq!(state.world.player.pos, state.config.player_spawn());
    assert!(!state.world.player.airborne);
    assert_eq!(state.best_score, 90);
    assert_eq!(state.world.ground.x1, 0.0);
}

#[test]
fn worse_run_leaves_best_alone() {
    let gateway = ScoreGateway::new(MemoryStore::with_score(DEFAULT_KEY, 200), DEFAULT_KEY);
    let mut session = GameSession::new(clear_path_config(), gateway);

    session.step([InputEvent::Primary]);
    for _ in 0..100 {
        session.step(IDLE);
    }
    force_collision(&mut session);
    let events = session.step_input(&Default::default());
    assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { score: 10 })));

    assert_eq!(session.state().phase, GamePhase::GameOver);
    assert_eq!(session.gateway().store().writes, 0);
    assert_eq!(session.snapshot().best_score, 200);
}

#[test]
fn best_score_survives_a_new_session() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = FileStore::new(dir.path()).unwrap();
        let mut session = GameSession::new(clear_path_config(), ScoreGateway::new(store, DEFAULT_KEY));
        assert_eq!(session.state().best_score, 0);

        session.step([InputEvent::Primary]);
        for _ in 0..249 {
            session.step(IDLE);
        }
        force_collision(&mut session);
        session.step(IDLE);
        assert_eq!(session.state().phase, GamePhase::GameOver);
    }

    let store = FileStore::new(dir.path()).unwrap();
    let session = GameSession::new(clear_path_config(), ScoreGateway::new(store, DEFAULT_KEY));
    assert_eq!(session.state().best_score, 25);
}

#[test]
fn jumping_clears_obstacles_with_default_tuning() {
    let mut session = GameSession::new(
        GameConfig::default(),
        ScoreGateway::new(MemoryStore::new(), DEFAULT_KEY),
    );
    session.step([InputEvent::Primary]);

    // Jump whenever an obstacle is about to reach the player
    for _ in 0..3000 {
        let state = session.state();
        let player_right = state.world.player.pos.x + PLAYER_WIDTH;
        let danger = state.world.entities.obstacles.iter().any(|o| {
            let gap = o.pos.x - player_right;
            gap > 0.0 && gap < o.speed * 6.0
        });
        let inputs: Vec<InputEvent> = if danger { vec![InputEvent::Primary] } else { vec![] };
        session.step(inputs);
        assert_eq!(session.state().phase, GamePhase::Playing);
    }
    assert!(session.state().score() >= 299);
}

#[test]
fn pause_freezes_the_run() {
    let mut session = GameSession::new(
        clear_path_config(),
        ScoreGateway::new(MemoryStore::new(), DEFAULT_KEY),
    );
    session.step([InputEvent::Primary]);
    session.step([InputEvent::TogglePause]);
    let score = session.state().world.run.score;

    for _ in 0..120 {
        let snap = session.step([InputEvent::Primary]);
        assert_eq!(snap.phase, GamePhase::Paused);
        assert_eq!(snap.banner[0], "Game Paused");
    }
    assert_eq!(session.state().world.run.score, score);

    session.step([InputEvent::TogglePause]);
    assert_eq!(session.state().phase, GamePhase::Playing);
}
