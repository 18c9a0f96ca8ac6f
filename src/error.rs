use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::snake::Cell;

/// Rejected game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid size must be at least {min}, got {size}")]
    GridTooSmall { size: u16, min: u16 },

    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },

    #[error("minimum tick interval ({min} ms) exceeds initial tick interval ({initial} ms)")]
    MinimumAboveInitial { min: u64, initial: u64 },

    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejected board setup (snake or food placement).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum PlacementError {
    #[error("snake must have at least one segment")]
    EmptySnake,

    #[error("snake segment {0:?} appears more than once")]
    DuplicateSegment(Cell),

    #[error("cell {0:?} is outside the grid")]
    OutOfBounds(Cell),

    #[error("food cannot be placed on the snake at {0:?}")]
    FoodOnSnake(Cell),
}

/// Top-level error surfaced by the binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal I/O failed")]
    Io(#[from] io::Error),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
