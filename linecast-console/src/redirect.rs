use std::sync::{Mutex, MutexGuard, PoisonError};

/// Serializes every swap of the process-wide standard output. A second
/// launch must not observe (or restore over) another launch's shadow console.
static STDOUT_SWAP: Mutex<()> = Mutex::new(());

pub(crate) fn lock() -> MutexGuard<'static, ()> {
    STDOUT_SWAP.lock().unwrap_or_else(PoisonError::into_inner)
}
