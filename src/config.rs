//! Game configuration: defaults plus a handful of environment overrides.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::error::GameError;
use crate::GridInt;

/// Board width in cells
pub const GRID_WIDTH: GridInt = 32;

/// Board height in cells
pub const GRID_HEIGHT: GridInt = 24;

/// Time between two simulation ticks
pub const STEP_MS: u64 = 120;

/// Seed for the food generator
pub const RNG_SEED: u64 = 12345;

/// Pause between frames, roughly 60 per second
pub const FRAME_INTERVAL_MS: u64 = 16;

pub const LOG_FILE: &str = "snake.log";

const SEED_VAR: &str = "SNAKE_SEED";
const STEP_VAR: &str = "SNAKE_STEP_MS";
const LOG_VAR: &str = "SNAKE_LOG";

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub width: GridInt,
    pub height: GridInt,
    pub step: Duration,
    pub seed: u64,
    pub frame_interval: Duration,
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            step: Duration::from_millis(STEP_MS),
            seed: RNG_SEED,
            frame_interval: Duration::from_millis(FRAME_INTERVAL_MS),
            log_file: PathBuf::from(LOG_FILE),
        }
    }
}

impl GameConfig {
    /// Defaults, overridden by `SNAKE_SEED`, `SNAKE_STEP_MS` and `SNAKE_LOG` when set.
    pub fn from_env() -> Result<Self, GameError> {
        let mut config = GameConfig::default();

        if let Some(seed) = parse_var(SEED_VAR, read_var(SEED_VAR)?.as_deref())? {
            config.seed = seed;
        }

        if let Some(ms) = parse_var::<u64>(STEP_VAR, read_var(STEP_VAR)?.as_deref())? {
            config.step = Duration::from_millis(ms);
        }

        if let Some(path) = env::var_os(LOG_VAR) {
            config.log_file = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GameError::Config(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }

        if self.step.as_nanos() == 0 {
            return Err(GameError::Config("step duration must be non-zero".to_string()));
        }

        Ok(())
    }
}

fn read_var(name: &str) -> Result<Option<String>, GameError> {
    match env::var(name) {
        Ok(raw) => Ok(Some(raw)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            Err(GameError::Config(format!("{} is not valid unicode", name)))
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, GameError> {
    match raw {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| GameError::Config(format!("{} must be an unsigned integer, got {:?}", name, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_board() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height), (32, 24));
        assert_eq!(config.step, Duration::from_millis(120));
        assert_eq!(config.seed, 12345);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_var_accepts_padded_numbers() {
        let seed: Option<u64> = parse_var(SEED_VAR, Some(" 42 ")).unwrap();
        assert_eq!(seed, Some(42));
        assert_eq!(parse_var::<u64>(SEED_VAR, None).unwrap(), None);
    }

    #[test]
    fn parse_var_rejects_garbage() {
        let err = parse_var::<u64>(STEP_VAR, Some("fast")).unwrap_err();
        assert!(matches!(err, GameError::Config(msg) if msg.contains(STEP_VAR)));
    }

    #[test]
    fn validate_rejects_empty_grid_and_zero_step() {
        let empty = GameConfig { width: 0, ..GameConfig::default() };
        assert!(matches!(empty.validate(), Err(GameError::Config(_))));

        let frozen = GameConfig { step: Duration::ZERO, ..GameConfig::default() };
        assert!(matches!(frozen.validate(), Err(GameError::Config(_))));
    }
}
