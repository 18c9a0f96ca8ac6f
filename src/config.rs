use std::fs;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_DIR_NAME: &str = "snake-engine";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default board edge length in cells.
pub const DEFAULT_GRID_SIZE: u16 = 20;

/// Smallest board that can hold a snake and a food cell.
pub const MIN_GRID_SIZE: u16 = 2;

/// Tick interval at the start of every game, in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 150;

/// Interval reduction applied each time food is eaten.
pub const DEFAULT_TICK_INTERVAL_STEP_MS: u64 = 5;

/// Floor for the tick interval, in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Terminal columns used to draw one grid cell, so cells look square.
pub const CELL_WIDTH: u16 = 2;

/// How a freshly reset game enters play.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMode {
    /// Wait in `Idle` until an explicit start trigger.
    #[default]
    Gated,
    /// Enter `Running` as soon as the game is reset.
    Immediate,
}

/// Engine parameters shared by every game session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub grid_size: u16,
    pub initial_tick_interval_ms: u64,
    pub tick_interval_step_ms: u64,
    pub min_tick_interval_ms: u64,
    pub start_mode: StartMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            initial_tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            tick_interval_step_ms: DEFAULT_TICK_INTERVAL_STEP_MS,
            min_tick_interval_ms: MIN_TICK_INTERVAL_MS,
            start_mode: StartMode::Gated,
        }
    }
}

impl GameConfig {
    /// Returns the default configuration on a custom board size.
    #[must_use]
    pub fn with_grid_size(grid_size: u16) -> Self {
        Self {
            grid_size,
            ..Self::default()
        }
    }

    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                size: self.grid_size,
                min: MIN_GRID_SIZE,
            });
        }
        if self.initial_tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "initial_tick_interval_ms",
            });
        }
        if self.min_tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "min_tick_interval_ms",
            });
        }
        if self.min_tick_interval_ms > self.initial_tick_interval_ms {
            return Err(ConfigError::MinimumAboveInitial {
                min: self.min_tick_interval_ms,
                initial: self.initial_tick_interval_ms,
            });
        }

        Ok(())
    }

    /// Loads configuration from `path`, or from the user config file when
    /// `path` is `None`.
    ///
    /// A missing user config file yields the defaults. An explicitly given
    /// path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => load_from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => load_from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}

/// Returns the platform-correct user config file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

fn load_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_config(raw: &str) -> Result<GameConfig, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Colors applied to the play field and popups.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_value: Color,
    pub hud_label: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Light green snake on dark gray, red food.
pub const THEME_CLASSIC: Theme = Theme {
    snake_head: Color::Green,
    snake_body: Color::LightGreen,
    food: Color::Red,
    play_bg: Color::Black,
    border_fg: Color::Gray,
    hud_value: Color::White,
    hud_label: Color::DarkGray,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};
