//! Terminal "game renderer" module.
//!
//! A small rendering layer for terminal gameplay. A [`GameView`] turns a world
//! snapshot into a framebuffer, and a [`TerminalRenderer`] flushes framebuffers
//! to the terminal through crossterm.
//!
//! Goals:
//! - Keep `core` free of terminal I/O
//! - Keep layout pure and unit-testable
//! - Redraw only what changed between frames

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use gridshot_core as core;
pub use gridshot_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport, GAME_OVER_TEXT, INSTRUCTIONS};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
