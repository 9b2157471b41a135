//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Command`] and applies them
//! to the shared world. Key reading sits behind the [`KeySource`] trait so the
//! engine can be driven by a scripted keyboard in tests.

pub mod handler;
pub mod map;

pub use gridshot_core as core;
pub use gridshot_types as types;

pub use handler::{Flow, InputError, InputHandler, KeySource, ScriptedKeys, TerminalKeys};
pub use map::{map_char, map_key};
