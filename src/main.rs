/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs;
use std::path::PathBuf;

use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::GameConfig;
use domain::grid::Grid;
use sim::event::Explosion;
use sim::spawn;
use sim::step;
use sim::world::WorldState;
use ui::input::{Command, InputState};
use ui::renderer::Renderer;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "robots.log";

fn main() {
    let log_path = setup_file_logging();

    let config = GameConfig::load();
    let mut world = spawn::new_game(
        Grid::new(config.width, config.height),
        config.enemy_count,
        pick_seed(&config),
    );

    let mut renderer = Renderer::new(&config.colors);
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("game loop aborted: {e}");
        eprintln!("Game error: {e}");
    }

    info!(turns = world.tick, enemies_left = world.enemies().len(), "session ended");
    println!("Robots left standing: {}", world.enemies().len());
    if let Some(path) = log_path {
        println!("Log: {}", path.display());
    }
}

/// Log to a file: the terminal belongs to the renderer while playing.
/// `RUST_LOG` overrides the default filter.
fn setup_file_logging() -> Option<PathBuf> {
    let log_dir = PathBuf::from(LOG_DIR);
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Logging disabled: cannot create {}: {e}", log_dir.display());
        return None;
    }

    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, LOG_FILE);
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("robots=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    Some(log_dir.join(LOG_FILE))
}

fn pick_seed(config: &GameConfig) -> u64 {
    config.seed.unwrap_or_else(rand::random)
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new(&config.keys)?;
    let mut explosions: Vec<Explosion> = Vec::new();

    loop {
        renderer.render(world, &explosions)?;

        match input.next_command()? {
            Command::Act(action) => {
                // Last turn's explosions are shown for exactly one frame.
                explosions = step::advance(world, action);
            }
            Command::Restart => {
                spawn::restart(world, config.enemy_count, pick_seed(config));
                explosions.clear();
            }
            Command::Redraw => {}
            Command::Quit => break,
        }
    }

    Ok(())
}
