//! Dino Dash entry point
//!
//! Native builds run the game in the terminal: load config, open the score
//! store, then poll → fixed-step ticks → draw until the player quits.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::fs::File;
    use std::path::{Path, PathBuf};
    use std::time::{Duration, Instant};

    use glam::Vec2;

    use dino_dash::persistence::{DEFAULT_KEY, FileStore};
    use dino_dash::platform::{self, TerminalGuard};
    use dino_dash::renderer::{self, Renderer, Viewport};
    use dino_dash::sim::TickInput;
    use dino_dash::{GameConfig, GameSession, MemoryStore, ScoreGateway, ScoreStore};

    const CONFIG_ENV: &str = "DINO_DASH_CONFIG";
    const LOG_FILE: &str = "dino-dash.log";

    fn config_path() -> Option<PathBuf> {
        std::env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    /// Logs go to a file: the terminal belongs to the game
    fn init_logging(dir: &Path) {
        let env = env_logger::Env::default().default_filter_or("info");
        let mut builder = env_logger::Builder::from_env(env);
        if let Ok(file) = std::fs::create_dir_all(dir).and_then(|_| File::create(dir.join(LOG_FILE))) {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        } else {
            // Nowhere safe to write; stay quiet rather than scribble on the screen
            builder.filter_level(log::LevelFilter::Off);
        }
        builder.init();
    }

    /// File store in the user data dir, in memory if that is unavailable
    fn open_store(dir: &Path) -> Box<dyn ScoreStore> {
        match FileStore::new(dir) {
            Ok(store) => {
                log::info!("Best scores stored in {}", store.dir().display());
                Box::new(store)
            }
            Err(e) => {
                log::warn!("No writable score dir ({}), best score will not persist", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let data_dir = FileStore::default_dir().unwrap_or_else(|| PathBuf::from(".dino-dash"));
        init_logging(&data_dir);
        log::info!("Dino Dash (native) starting...");

        let config = match config_path() {
            Some(path) => GameConfig::load(&path)?,
            None => GameConfig::default(),
        };
        config.validate()?;

        let gateway = ScoreGateway::new(open_store(&data_dir), DEFAULT_KEY);
        let mut session = GameSession::new(config, gateway);

        let world = Vec2::new(
            session.state().config.screen_width,
            session.state().config.screen_height,
        );
        let frame_budget = Duration::from_secs_f64(session.state().config.tick_duration_secs());

        let terminal = TerminalGuard::enter()?;
        let (cols, rows) = terminal.size()?;
        let mut view = Viewport::new(cols, rows, world);
        let mut renderer = Renderer::new(std::io::stdout());
        let mut pending = TickInput::default();
        let mut last = Instant::now();

        loop {
            let polled = platform::poll(frame_budget, &view)?;
            if let Some((cols, rows)) = polled.resized {
                view = Viewport::new(cols, rows, world);
                renderer.invalidate();
            }
            for input in polled.inputs {
                pending.push(input);
            }

            let now = Instant::now();
            session.frame((now - last).as_secs_f64(), &mut pending);
            last = now;

            if session.should_quit() {
                break;
            }
            renderer.present(renderer::draw(&session.snapshot(), &view))?;
        }

        drop(terminal);
        log::info!("Dino Dash exiting, best score {}", session.state().best_score);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No terminal in the browser; embedders drive `GameSession` directly
}
