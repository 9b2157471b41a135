//! Construction-time game configuration.
//!
//! Values are layered: built-in defaults, then an optional JSON file, then
//! command-line flags. Each layer is a [`ConfigOverrides`] whose `None` fields
//! leave the layer below untouched. The JSON keys are camelCase:
//!
//! ```json
//! { "width": 40, "height": 24, "frameRate": 25, "cursorPos": { "x": 20, "y": 21 }, "startNumEnemies": 10 }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    Coord, DEFAULT_ENEMY_COUNT, DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_GRID_SIDE, MIN_GRID_SIDE, TICK_MS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small (minimum {min}x{min})", min = MIN_GRID_SIDE)]
    GridTooSmall { width: i32, height: i32 },
    #[error("grid {width}x{height} is too large (maximum {max}x{max})", max = MAX_GRID_SIDE)]
    GridTooLarge { width: i32, height: i32 },
    #[error("frame rate must be at least 1ms")]
    ZeroFrameRate,
    #[error("cursor position {0} is not inside the walls")]
    CursorOutOfBounds(Coord),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolved game parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    /// Simulation tick interval
    pub frame_rate: Duration,
    pub cursor_pos: Coord,
    pub start_num_enemies: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            frame_rate: Duration::from_millis(TICK_MS),
            cursor_pos: default_cursor(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            start_num_enemies: DEFAULT_ENEMY_COUNT,
        }
    }
}

fn default_cursor(width: i32, height: i32) -> Coord {
    Coord::new(width / 2, height - 3)
}

impl GameConfig {
    /// Apply a layer of overrides.
    ///
    /// When the grid size changes but no cursor position is given, the cursor
    /// default is recomputed for the new size.
    pub fn with_overrides(mut self, o: &ConfigOverrides) -> Self {
        let resized = o.width.is_some() || o.height.is_some();
        if let Some(w) = o.width {
            self.width = w;
        }
        if let Some(h) = o.height {
            self.height = h;
        }
        if let Some(ms) = o.frame_rate {
            self.frame_rate = Duration::from_millis(ms);
        }
        match o.cursor_pos {
            Some(pos) => self.cursor_pos = pos,
            None if resized => self.cursor_pos = default_cursor(self.width, self.height),
            None => {}
        }
        if let Some(n) = o.start_num_enemies {
            self.start_num_enemies = n;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_GRID_SIDE || self.height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_GRID_SIDE || self.height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.frame_rate.is_zero() {
            return Err(ConfigError::ZeroFrameRate);
        }
        if !self.is_interior(self.cursor_pos) {
            return Err(ConfigError::CursorOutOfBounds(self.cursor_pos));
        }
        Ok(())
    }

    /// True for cells strictly inside the perimeter walls.
    pub fn is_interior(&self, pos: Coord) -> bool {
        pos.x > 0 && pos.x < self.width - 1 && pos.y > 0 && pos.y < self.height - 1
    }
}

/// One configuration layer (file or CLI).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverrides {
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Tick interval in milliseconds
    pub frame_rate: Option<u64>,
    pub cursor_pos: Option<Coord>,
    pub start_num_enemies: Option<u32>,
}

impl ConfigOverrides {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
