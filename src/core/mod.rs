//! Core module - Low-level building blocks
//!
//! Target memory snapshots, the indentable output stream and the
//! compute-once cells used by the printer.

pub mod lazy;
pub mod memory;
pub mod stream;

// Re-export common types
pub use lazy::{LazyBool, LazyMember};
pub use memory::{MemoryError, MemoryImage, MemoryProtection, MemoryRegion};
pub use stream::Stream;
