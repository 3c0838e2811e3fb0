use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::error::ConfigError;
use crate::player::Player;
use crate::render::Canvas;

const CONFIG_ENV_VAR: &str = "BLOCKADE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/blockade.toml";

/// Game settings. Any field left out of the TOML file keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Arena width in arena units.
    pub width: i32,
    /// Arena height in arena units.
    pub height: i32,
    /// Edge of one grid cell; every position is a multiple of it.
    pub cell_size: i32,
    /// Wall-clock time between simulation steps.
    pub step_interval_ms: u64,
    /// Commands buffered between two steps before new ones are dropped.
    pub input_queue_capacity: usize,
    /// Where to write the log. Stdout is the game screen, so logging is off
    /// unless this or `BLOCKADE_LOG` is set.
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            cell_size: 20,
            step_interval_ms: 100,
            input_queue_capacity: 32,
            log_file: None,
        }
    }
}

impl GameConfig {
    /// Reads the file named by `BLOCKADE_CONFIG`, then `config/blockade.toml`,
    /// falling back to defaults when neither exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_PATH),
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config: Self = toml::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0 {
            return Err(invalid(format!("cell_size must be positive, got {}", self.cell_size)));
        }
        if self.width <= 0 || self.width % self.cell_size != 0 {
            return Err(invalid(format!(
                "width {} must be a positive multiple of cell_size {}",
                self.width, self.cell_size
            )));
        }
        if self.height <= 0 || self.height % self.cell_size != 0 {
            return Err(invalid(format!(
                "height {} must be a positive multiple of cell_size {}",
                self.height, self.cell_size
            )));
        }
        if self.step_interval_ms == 0 {
            return Err(invalid("step_interval_ms must be non-zero".to_string()));
        }
        if self.input_queue_capacity == 0 {
            return Err(invalid("input_queue_capacity must be non-zero".to_string()));
        }

        let arena = self.arena();
        if Canvas::checked_size_for(&arena).is_none() {
            return Err(invalid(format!(
                "arena of {}x{} cells is too large to draw",
                arena.cols(), arena.rows()
            )));
        }

        for &player in Player::ALL.iter() {
            let start = arena.start_cell(player);
            if !arena.is_aligned(start) {
                return Err(invalid(format!(
                    "start cell ({}, {}) of {} is off the grid",
                    start.x, start.y, player.name()
                )));
            }
        }

        Ok(())
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.width, self.height, self.cell_size)
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}
