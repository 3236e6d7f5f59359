use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("could not start the logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("terminal is {cols}x{rows} but the board needs {needed_cols}x{needed_rows}")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        needed_cols: u16,
        needed_rows: u16,
    },
}
