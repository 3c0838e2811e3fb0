mod arena;
mod config;
mod error;
mod game;
mod input;
mod player;
mod render;
mod scheduler;
mod state;
mod term;

use std::{fs::File, path::PathBuf, process::exit, sync::Mutex};

use crate::config::GameConfig;
use crate::error::AppError;

use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "BLOCKADE_LOG";

fn main() {
    if let Err(err) = run() {
        eprintln!("blockade: {}", err);
        exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let config = GameConfig::load()?;
    init_logging(&config)?;
    info!(?config, "Blockade starting");

    let mut game = game::BlockadeGame::new(config)?;
    // The terminal is restored whether the game ended cleanly or not
    let result = game.start();
    game.shutdown();
    result
}

fn init_logging(config: &GameConfig) -> Result<(), AppError> {
    let path = match std::env::var_os(LOG_ENV_VAR).map(PathBuf::from).or_else(|| config.log_file.clone()) {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = File::create(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
