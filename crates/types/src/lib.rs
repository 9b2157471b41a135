//! Shared types module - coordinates, entity tags and game constants
//!
//! This crate defines the plain data types used throughout the workspace.
//! Everything here is `Copy` data with no behavior beyond conversions, so it
//! can be used from the simulation core, the input mapper and the renderer alike.
//!
//! # Grid
//!
//! The playfield is a rectangular grid of cells addressed by [`Coord`]:
//!
//! - `x` grows to the right, `y` grows downward (row 0 is the top wall)
//! - The outermost ring of cells is always wall
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 25 | Fixed simulation poll interval |
//! | `ENEMY_STEP_MS` | 1000 | Enemy patrol cadence |
//! | `BULLET_STEP_MS` | 50 | Bullet flight cadence |
//! | `BULLET_TTL_MS` | 1000 | Bullet lifetime |
//! | `EXPLOSION_TTL_MS` | 500 | Explosion lifetime |
//! | `GAME_OVER_GRACE_MS` | 1000 | Pause on the final frame before shutdown |
//! | `EXIT_GRACE_MS` | 500 | Pause after the exit message |

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Default grid dimensions
pub const DEFAULT_WIDTH: i32 = 30;
pub const DEFAULT_HEIGHT: i32 = 20;
/// Smallest grid that still has an interior to play in
pub const MIN_GRID_SIDE: i32 = 5;
/// Largest grid side; frames must fit a terminal
pub const MAX_GRID_SIDE: i32 = 1000;

pub const DEFAULT_ENEMY_COUNT: u32 = 15;

/// Simulation timing constants (in milliseconds)
pub const TICK_MS: u64 = 25;
pub const ENEMY_STEP_MS: u64 = 1000;
pub const BULLET_STEP_MS: u64 = 50;
pub const BULLET_TTL_MS: u64 = 1000;
pub const EXPLOSION_TTL_MS: u64 = 500;
pub const GAME_OVER_GRACE_MS: u64 = 1000;
pub const EXIT_GRACE_MS: u64 = 500;

/// Enemy patrol: drift down while weaving one column left and right.
pub const ENEMY_PATTERN: [Coord; 5] = [
    Coord::new(0, 1),
    Coord::new(1, 1),
    Coord::new(-1, 1),
    Coord::new(-1, 1),
    Coord::new(1, 1),
];

/// Bullets fly straight up.
pub const BULLET_PATTERN: [Coord; 1] = [Coord::UP];

/// Glyphs
pub const WALL_GLYPH: char = '\u{2593}';
pub const ENEMY_GLYPH: char = '\u{25C8}';
pub const CURSOR_GLYPH: char = '\u{1F726}';
pub const BULLET_GLYPH: char = '|';
pub const EXPLOSION_GLYPH: char = '\u{2736}';

/// Integer grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const UP: Coord = Coord::new(0, -1);
    pub const DOWN: Coord = Coord::new(0, 1);
    pub const LEFT: Coord = Coord::new(-1, 0);
    pub const RIGHT: Coord = Coord::new(1, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, rhs: Coord) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Interaction class of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Passive scenery that never moves (walls).
    Environment,
    /// The single user-controlled cursor.
    Player,
    /// Everything else: enemies, bullets, explosions.
    Computer,
}

/// Entity discriminant without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Wall,
    Enemy,
    Cursor,
    Bullet,
    Explosion,
}

impl Kind {
    pub fn category(&self) -> Category {
        match self {
            Kind::Wall => Category::Environment,
            Kind::Cursor => Category::Player,
            Kind::Enemy | Kind::Bullet | Kind::Explosion => Category::Computer,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Kind::Wall => WALL_GLYPH,
            Kind::Enemy => ENEMY_GLYPH,
            Kind::Cursor => CURSOR_GLYPH,
            Kind::Bullet => BULLET_GLYPH,
            Kind::Explosion => EXPLOSION_GLYPH,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Wall => "wall",
            Kind::Enemy => "enemy",
            Kind::Cursor => "cursor",
            Kind::Bullet => "bullet",
            Kind::Explosion => "explosion",
        }
    }
}

/// Player intents produced by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    MoveUp,
    MoveLeft,
    MoveDown,
    MoveRight,
    Fire,
}

impl Command {
    /// One-cell delta for movement commands.
    pub fn delta(&self) -> Option<Coord> {
        match self {
            Command::MoveUp => Some(Coord::UP),
            Command::MoveLeft => Some(Coord::LEFT),
            Command::MoveDown => Some(Coord::DOWN),
            Command::MoveRight => Some(Coord::RIGHT),
            Command::Quit | Command::Fire => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Quit => "quit",
            Command::MoveUp => "moveUp",
            Command::MoveLeft => "moveLeft",
            Command::MoveDown => "moveDown",
            Command::MoveRight => "moveRight",
            Command::Fire => "fire",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_addition() {
        assert_eq!(Coord::new(3, 4) + Coord::UP, Coord::new(3, 3));
        let mut c = Coord::new(0, 0);
        c += Coord::RIGHT;
        c += Coord::DOWN;
        assert_eq!(c, Coord::new(1, 1));
    }

    #[test]
    fn enemy_pattern_nets_straight_down() {
        let net = ENEMY_PATTERN
            .iter()
            .fold(Coord::default(), |acc, &step| acc + step);
        assert_eq!(net, Coord::new(0, 5));
    }

    #[test]
    fn categories_follow_kind() {
        assert_eq!(Kind::Wall.category(), Category::Environment);
        assert_eq!(Kind::Cursor.category(), Category::Player);
        assert_eq!(Kind::Enemy.category(), Category::Computer);
        assert_eq!(Kind::Bullet.category(), Category::Computer);
        assert_eq!(Kind::Explosion.category(), Category::Computer);
    }

    #[test]
    fn only_moves_have_deltas() {
        assert_eq!(Command::MoveLeft.delta(), Some(Coord::new(-1, 0)));
        assert_eq!(Command::Fire.delta(), None);
        assert_eq!(Command::Quit.delta(), None);
    }
}
