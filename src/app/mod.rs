//! App module - session state and commands
//!
//! Shared by the interactive REPL and batch (`--exec`) mode.

mod commands;
mod state;

pub use commands::*;
pub use state::*;
