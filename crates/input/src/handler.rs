//! Applies player commands to the shared world.
//!
//! Movement is only recorded as a pending delta on the cursor; the next
//! simulation tick applies it. Firing inserts a bullet directly, stamped with
//! the current simulation time.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use thiserror::Error;
use tracing::{debug, trace};

use crate::core::{Entity, SimClock, StoreError, World, WorldStore};
use crate::map::map_key;
use crate::types::{Command, Coord};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),
    #[error("cursor not found in world store")]
    CursorMissing,
}

/// What the input activity should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A blocking source of key presses.
pub trait KeySource {
    /// Wait up to `timeout` for the next key press. `Ok(None)` on timeout.
    fn next_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>, InputError>;
}

/// Reads key presses from the terminal. Raw mode must already be enabled.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>, InputError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

/// Replays a fixed key sequence, then behaves like an idle keyboard.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<KeyEvent>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn from_chars(text: &str) -> Self {
        Self::new(text.chars().map(|ch| KeyEvent::from(crossterm::event::KeyCode::Char(ch))))
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>, InputError> {
        match self.keys.pop_front() {
            Some(key) => Ok(Some(key)),
            None => {
                std::thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}

/// Turns commands into world mutations.
#[derive(Debug, Clone)]
pub struct InputHandler {
    store: Arc<WorldStore>,
    clock: SimClock,
}

impl InputHandler {
    pub fn new(world: &World) -> Self {
        Self {
            store: Arc::clone(world.store()),
            clock: world.clock().clone(),
        }
    }

    /// Map and apply one key. Unrecognized keys are ignored.
    pub fn handle_key(&self, key: KeyEvent) -> Result<Flow, InputError> {
        match map_key(key) {
            Some(command) => self.apply(command),
            None => Ok(Flow::Continue),
        }
    }

    pub fn apply(&self, command: Command) -> Result<Flow, InputError> {
        trace!(command = command.as_str(), "input");
        match command {
            Command::Quit => Ok(Flow::Quit),
            Command::Fire => {
                let Some(cursor) = self.store.cursor() else {
                    return self.cursor_missing();
                };
                let at = cursor + Coord::UP;
                if !self.store.insert_vacant(Entity::bullet(at, self.clock.now())) {
                    debug!(%at, "fire blocked");
                }
                Ok(Flow::Continue)
            }
            Command::MoveUp | Command::MoveLeft | Command::MoveDown | Command::MoveRight => {
                let Some(delta) = command.delta() else {
                    return Ok(Flow::Continue);
                };
                match self.store.set_cursor_delta(delta) {
                    Ok(()) => Ok(Flow::Continue),
                    Err(StoreError::CursorMissing) => self.cursor_missing(),
                    Err(_) => Ok(Flow::Continue),
                }
            }
        }
    }

    // After game over the cursor is legitimately gone until shutdown.
    fn cursor_missing(&self) -> Result<Flow, InputError> {
        if self.clock.is_stopped() {
            Ok(Flow::Continue)
        } else {
            Err(InputError::CursorMissing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::types::{Kind, BULLET_GLYPH};

    fn world() -> World {
        World::new(GameConfig::default()).unwrap()
    }

    #[test]
    fn move_records_pending_delta_only() {
        let world = world();
        let input = InputHandler::new(&world);
        let cursor = world.store().cursor().unwrap();

        assert_eq!(input.apply(Command::MoveLeft).unwrap(), Flow::Continue);
        assert_eq!(world.store().cursor(), Some(cursor));
        assert_eq!(
            world.store().get(cursor).unwrap().pending_delta(),
            Some(Coord::LEFT)
        );

        // Later requests replace earlier ones until a tick consumes them.
        input.apply(Command::MoveDown).unwrap();
        assert_eq!(
            world.store().get(cursor).unwrap().pending_delta(),
            Some(Coord::DOWN)
        );
    }

    #[test]
    fn fire_spawns_bullet_above_cursor() {
        let world = world();
        let input = InputHandler::new(&world);
        let cursor = world.store().cursor().unwrap();

        input.apply(Command::Fire).unwrap();
        let bullet = world.store().get(cursor + Coord::UP).unwrap();
        assert_eq!(bullet.kind(), Kind::Bullet);
        assert_eq!(bullet.glyph(), BULLET_GLYPH);
        assert_eq!(bullet.movement().unwrap().last_moved(), world.clock().now());
    }

    #[test]
    fn fire_never_overwrites_an_occupant() {
        let config = GameConfig {
            cursor_pos: Coord::new(5, 1),
            start_num_enemies: 0,
            ..GameConfig::default()
        };
        let world = World::new(config).unwrap();
        let input = InputHandler::new(&world);

        input.apply(Command::Fire).unwrap();
        assert_eq!(
            world.store().get(Coord::new(5, 0)).map(|e| e.kind()),
            Some(Kind::Wall)
        );
    }

    #[test]
    fn quit_and_unknown_keys() {
        let world = world();
        let input = InputHandler::new(&world);
        let before = world.store().snapshot();

        let key = |ch| KeyEvent::from(crossterm::event::KeyCode::Char(ch));
        assert_eq!(input.handle_key(key('x')).unwrap(), Flow::Continue);
        assert_eq!(world.store().snapshot(), before);
        assert_eq!(input.handle_key(key('Q')).unwrap(), Flow::Quit);
    }

    #[test]
    fn missing_cursor_is_an_error_while_running() {
        let world = world();
        let input = InputHandler::new(&world);
        let cursor = world.store().cursor().unwrap();
        world.store().remove(cursor);

        assert!(matches!(
            input.apply(Command::MoveUp),
            Err(InputError::CursorMissing)
        ));
        assert!(matches!(
            input.apply(Command::Fire),
            Err(InputError::CursorMissing)
        ));
    }

    #[test]
    fn missing_cursor_after_game_over_is_ignored() {
        let config = GameConfig {
            cursor_pos: Coord::new(5, 1),
            start_num_enemies: 0,
            ..GameConfig::default()
        };
        let world = World::new(config).unwrap();
        let input = InputHandler::new(&world);
        let mut sim = world.simulation();

        input.apply(Command::MoveUp).unwrap();
        assert!(sim.tick().game_over);

        assert_eq!(input.apply(Command::MoveUp).unwrap(), Flow::Continue);
        assert_eq!(input.apply(Command::Fire).unwrap(), Flow::Continue);
    }

    #[test]
    fn scripted_keys_drain_in_order() {
        let mut keys = ScriptedKeys::from_chars("wd");
        let timeout = Duration::from_millis(1);
        assert_eq!(
            keys.next_key(timeout).unwrap().map(|k| k.code),
            Some(crossterm::event::KeyCode::Char('w'))
        );
        assert_eq!(keys.remaining(), 1);
        keys.next_key(timeout).unwrap();
        assert!(keys.next_key(timeout).unwrap().is_none());
    }
}
