//! Game engine: the concurrent activities around the simulation core.
//!
//! [`run`] wires a [`World`](crate::core::World), a key source and a terminal
//! renderer together and blocks until the session ends, either by the player
//! quitting or by game over. Termination is a one-shot [`Shutdown`] broadcast.

pub mod runtime;
pub mod shutdown;

pub use gridshot_core as core;
pub use gridshot_input as input;
pub use gridshot_term as term;
pub use gridshot_types as types;

pub use runtime::{run, run_async, EngineReport, EngineTiming, EXIT_MESSAGE};
pub use shutdown::Shutdown;
