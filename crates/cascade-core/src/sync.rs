//! Synchronization utilities for handling poisoned locks.

use std::sync::{Mutex, MutexGuard};

/// Extension trait for `Mutex` that ignores lock poisoning.
///
/// Session counters stay meaningful even if a thread panicked mid-route, so the
/// router keeps going instead of propagating the poison.
pub trait IgnoreLock<T> {
    /// Lock the mutex, recovering the guard if the lock is poisoned.
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T>;
}

impl<T> IgnoreLock<T> for Mutex<T> {
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T> {
        match self.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
