//! valprint - Debugger value-object printer
//!
//! Renders debuggee values as the indented, cycle-safe text a debugger's
//! `frame variable` command shows.
//!
//! - `core`: output stream, memory image, compute-once cells
//! - `value`: the `ValueObject` capability and formatter collaborators
//! - `printer`: the recursive printer and its options
//! - `target`: a simulated debuggee producing `ValueObject`s
//! - `app` / `ui`: session state and the REPL

pub mod app;
pub mod core;
pub mod printer;
pub mod target;
pub mod ui;
pub mod value;
