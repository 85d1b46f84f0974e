//! Lazy - Compute-once cells for per-node facts
//!
//! A `LazyMember` memoizes the result of an update function the first time it
//! is read. The printer uses these for classification facts that are cheap to
//! store but may be expensive to compute (e.g. nil checks read target memory).

use std::cell::Cell;

/// Memoized value computed by an update function on first access
#[derive(Debug)]
pub struct LazyMember<T: Copy> {
    value: Cell<Option<T>>,
}

impl<T: Copy> LazyMember<T> {
    /// Create an empty cell that will compute on the next `get`
    pub const fn new() -> Self {
        Self {
            value: Cell::new(None),
        }
    }

    /// Return the cached value, running `update` only if nothing is cached
    pub fn get(&self, update: impl FnOnce() -> T) -> T {
        match self.value.get() {
            Some(value) => value,
            None => {
                let value = update();
                self.value.set(Some(value));
                value
            }
        }
    }

    /// Store a value directly, bypassing the update function
    pub fn set(&self, value: T) {
        self.value.set(Some(value));
    }

    /// Force the next `get` to recompute
    pub fn reset(&self) {
        self.value.set(None);
    }

    /// Whether a value is currently cached
    pub fn is_cached(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T: Copy> Default for LazyMember<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Boolean specialization used for classification facts
pub type LazyBool = LazyMember<bool>;
