// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic state cells.
//!
//! Each cell holds one of the ledger's maps. Updates are linearizable per
//! cell; readers take an owned snapshot and never hold the lock across
//! caller code. Cross-cell consistency is the writer gate's job, not ours.

use parking_lot::RwLock;

/// A single shared mutable value with snapshot reads.
pub struct Cell<T> {
    inner: RwLock<T>,
}

impl<T: Clone> Cell<T> {
    pub fn new(value: T) -> Self {
        Self { inner: RwLock::new(value) }
    }

    /// Owned copy of the current value.
    pub fn snapshot(&self) -> T {
        self.inner.read().clone()
    }

    /// Read through a closure without cloning.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.read())
    }

    /// Apply a transformation under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl<T: Clone + Default> Default for Cell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
#[path = "cell_tests.rs"]
mod tests;
