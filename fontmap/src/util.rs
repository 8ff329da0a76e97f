// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the guard if another thread panicked while
/// holding it. All guarded state stays consistent across a panic since it
/// is only ever mutated through whole-value updates.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
