//! Gridshot (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof as
//! `gridshot::{core,engine,input,term,types}`; the implementation lives in
//! dedicated crates under `crates/`.

pub use gridshot_core as core;
pub use gridshot_engine as engine;
pub use gridshot_input as input;
pub use gridshot_term as term;
pub use gridshot_types as types;
