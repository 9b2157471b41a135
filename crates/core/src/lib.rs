//! Core game logic module - pure, deterministic, and testable
//!
//! This crate owns the world model and the per-tick rules. It performs no
//! terminal I/O and spawns no threads, which keeps every rule unit-testable.
//!
//! # Module Structure
//!
//! - [`entity`]: tagged entity variants, patrol patterns and lifetimes
//! - [`store`]: lock-guarded position → entity map
//! - [`clock`]: simulation time shared with the input activity
//! - [`simulation`]: tick pass, collision and interaction rules
//! - [`snapshot`]: read-only grid copy for the renderer
//! - [`config`]: construction-time parameters and their layering
//! - [`world`]: perimeter, cursor and enemy formation setup
//!
//! # Game Rules
//!
//! - Walls line the whole perimeter and never move
//! - Enemies weave downward one step per second
//! - The player fires bullets straight up; a bullet that reaches an enemy
//!   destroys it and scores a point
//! - The player touching a wall, an enemy, a bullet or an explosion ends the game
//!
//! # Example
//!
//! ```
//! use gridshot_core::{GameConfig, World};
//! use gridshot_core::types::Coord;
//!
//! let world = World::new(GameConfig::default()).unwrap();
//! let mut sim = world.simulation();
//!
//! world.store().set_cursor_delta(Coord::LEFT).unwrap();
//! let outcome = sim.tick();
//! assert!(outcome.dirty);
//! assert_eq!(world.store().cursor(), Some(Coord::new(14, 17)));
//! ```

pub mod clock;
pub mod config;
pub mod entity;
pub mod simulation;
pub mod snapshot;
pub mod store;
pub mod world;

pub use gridshot_types as types;

pub use clock::SimClock;
pub use config::{ConfigError, ConfigOverrides, GameConfig};
pub use entity::{Body, Entity, EntityId, Expiry, Movement};
pub use simulation::{Interaction, Simulation, TickOutcome};
pub use snapshot::GameSnapshot;
pub use store::{StoreError, WorldStore};
pub use world::{formation, World};
