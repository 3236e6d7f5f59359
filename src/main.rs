mod config;
mod error;
mod game;
mod snake;
mod term;

use std::fs::File;

use log::{error, info, LevelFilter};
use simplelog::{Config, WriteLogger};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::term::TermManager;

pub type GridInt = i32;
pub type Cell = (GridInt, GridInt);

fn main() -> Result<(), GameError> {
    let config = GameConfig::from_env()?;

    // The terminal is taken over by the game, so logs go to a file
    let level = if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info };
    WriteLogger::init(level, Config::default(), File::create(&config.log_file)?)?;

    info!(
        "Starting snake on a {}x{} grid, step {:?}, seed {}",
        config.width, config.height, config.step, config.seed
    );

    let mut term = TermManager::new(config.width, config.height)?;
    term.setup()?;

    let result = game::play(&config, &mut term);
    term.restore()?;

    if let Err(err) = &result {
        error!("Game loop stopped: {}", err);
    }

    result
}
