//! The board-wide mutual-exclusion primitive (spec §4.6).
//!
//! `tokio::sync::Mutex` already gives FIFO-fair queueing of acquirers and
//! always releases its guard on drop, including while unwinding through a
//! panic, so this wrapper does not reimplement any of that. It exists so
//! call sites read as "run this critical section under the board lock"
//! instead of repeating `lock().await` bookkeeping everywhere. None of the
//! board's critical sections need to suspend internally (spec §5: "no other
//! operation suspends" while the lock is held), so `f` is a plain
//! synchronous closure; `run` itself is async only for the lock acquisition.

use tokio::sync::Mutex;

pub struct AsyncLock<T> {
    inner: Mutex<T>,
}

impl<T> AsyncLock<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Runs `f` with exclusive access to the guarded state. Acquirers are
    /// served in FIFO order; there is no reentrancy.
    pub async fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}
