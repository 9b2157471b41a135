//! Read-only frame snapshot handed to the renderer.

use crate::config::GameConfig;
use crate::store::WorldStore;
use crate::types::Coord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: i32,
    pub height: i32,
    /// Row-major glyphs, `None` for empty cells
    pub cells: Vec<Option<char>>,
    pub score: u32,
    pub game_over: bool,
}

impl GameSnapshot {
    /// Copy the grid out of the store under a single read lock.
    pub fn capture(store: &WorldStore, config: &GameConfig, score: u32, game_over: bool) -> Self {
        Self {
            width: config.width,
            height: config.height,
            cells: store.glyph_grid(config.width, config.height),
            score,
            game_over,
        }
    }

    pub fn glyph_at(&self, pos: Coord) -> Option<char> {
        if pos.x < 0 || pos.x >= self.width || pos.y < 0 || pos.y >= self.height {
            return None;
        }
        let idx = pos.y as usize * self.width as usize + pos.x as usize;
        self.cells.get(idx).copied().flatten()
    }
}
