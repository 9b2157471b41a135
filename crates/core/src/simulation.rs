//! Simulation step - per-tick movement, expiry and collision resolution
//!
//! Each tick snapshots the world and walks the snapshot in creation order. For
//! every entity still in place, the first matching rule applies:
//!
//! 1. The entity has expired: remove it, even if a step is also due.
//! 2. A patrol step is due: take it, or interact with whatever is in the way.
//! 3. It is the cursor with a pending delta: apply it once, or interact.
//!
//! All position changes go through this module; the input layer only records
//! intent. The outer tick is a fine-grained poll for due entities, not a
//! variable-timestep integrator.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::clock::SimClock;
use crate::entity::Entity;
use crate::store::{StoreError, WorldStore};
use crate::types::{Category, Coord, Kind};

/// What a blocked move turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// The player hit something deadly; the game is over.
    PlayerDestroyed { at: Coord },
    /// A bullet and an enemy destroyed each other.
    Kill { at: Coord },
    /// No rule matched; the mover simply stays put.
    Blocked,
}

/// Result of one [`Simulation::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Something changed and the frame should be redrawn.
    pub dirty: bool,
    pub game_over: bool,
    pub score: u32,
}

/// Owns the simulation-side scalar state and drives the world forward.
#[derive(Debug)]
pub struct Simulation {
    store: Arc<WorldStore>,
    clock: SimClock,
    tick_interval: Duration,
    now: Duration,
    score: u32,
    game_over: bool,
}

impl Simulation {
    pub fn new(store: Arc<WorldStore>, clock: SimClock, tick_interval: Duration) -> Self {
        let now = clock.now();
        Self {
            store,
            clock,
            tick_interval,
            now,
            score: 0,
            game_over: false,
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn store(&self) -> &Arc<WorldStore> {
        &self.store
    }

    fn outcome(&self, dirty: bool) -> TickOutcome {
        TickOutcome {
            dirty,
            game_over: self.game_over,
            score: self.score,
        }
    }

    /// Process one tick at the current clock, then advance the clock.
    ///
    /// Once the game is over this is a no-op.
    pub fn tick(&mut self) -> TickOutcome {
        if self.game_over {
            return self.outcome(false);
        }

        let mut dirty = false;
        for snapshot in self.store.snapshot() {
            // Skip entities removed or replaced earlier in this pass.
            let Some(current) = self.store.get(snapshot.position) else {
                continue;
            };
            if current.id() != snapshot.id() {
                continue;
            }

            if self.update_entity(&current) {
                dirty = true;
            }
            if self.game_over {
                break;
            }
        }

        self.now += self.tick_interval;
        self.clock.publish(self.now);
        self.outcome(dirty)
    }

    fn update_entity(&mut self, entity: &Entity) -> bool {
        let pos = entity.position;

        if entity.expiry().is_some_and(|e| e.is_expired(self.now)) {
            self.store.remove(pos);
            return true;
        }

        if entity.movement().is_some_and(|m| m.is_due(self.now)) {
            let step = self
                .store
                .update(pos, |e| e.movement_mut().and_then(|m| m.advance()))
                .flatten();
            if let Some(step) = step {
                self.step_to(pos, pos + step);
            }
            return true;
        }

        if entity.pending_delta().is_some() {
            if let Some((at, delta)) = self.store.take_cursor_delta() {
                self.step_to(at, at + delta);
            }
            return true;
        }

        false
    }

    /// Move the occupant of `from` to `to`, or resolve the collision.
    fn step_to(&mut self, from: Coord, to: Coord) {
        match self.store.relocate(from, to) {
            Ok(()) => {}
            Err(StoreError::Occupied(_)) => {
                if let (Some(mover), Some(occupant)) = (self.store.get(from), self.store.get(to)) {
                    self.interact(&mover, &occupant);
                }
            }
            Err(_) => {}
        }
    }

    /// Resolve `mover` trying to enter the cell held by `occupant`.
    pub fn interact(&mut self, mover: &Entity, occupant: &Entity) -> Interaction {
        use Category::{Computer, Environment, Player};

        match (mover.category(), occupant.category()) {
            (Player, Computer) | (Computer, Player) => {
                let hazard = if mover.category() == Computer { mover } else { occupant };
                let at = hazard.position;
                self.end_game(at, hazard.kind());
                self.store.remove(mover.position);
                self.store.remove(occupant.position);
                self.store.set(Entity::explosion(at, self.now));
                Interaction::PlayerDestroyed { at }
            }
            // Environment never moves, so only the player can be the mover here.
            (Player, Environment) => {
                let at = mover.position;
                self.end_game(at, occupant.kind());
                self.store.remove(at);
                self.store.set(Entity::explosion(at, self.now));
                Interaction::PlayerDestroyed { at }
            }
            _ => match (mover.kind(), occupant.kind()) {
                (Kind::Enemy, Kind::Bullet) | (Kind::Bullet, Kind::Enemy) => {
                    let struck = if mover.kind() == Kind::Bullet { occupant } else { mover };
                    let at = struck.position;
                    self.store.remove(mover.position);
                    self.store.remove(occupant.position);
                    self.store.set(Entity::explosion(at, self.now));
                    self.score += 1;
                    debug!(%at, score = self.score, "enemy destroyed");
                    Interaction::Kill { at }
                }
                _ => Interaction::Blocked,
            },
        }
    }

    /// Must run before the cursor is removed: input treats a missing cursor as
    /// an error unless the clock is already stopped.
    fn end_game(&mut self, at: Coord, cause: Kind) {
        self.game_over = true;
        self.clock.stop();
        info!(%at, cause = cause.as_str(), score = self.score, "player destroyed");
    }
}
