use std::cell::Cell;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// Per-project mutation lock.
///
/// Re-entrant so a write action may nest inside another one on the same
/// thread; other threads block until the outermost scope ends.
#[derive(Clone, Default)]
pub struct WriteLock {
    inner: Arc<ReentrantMutex<Cell<u32>>>,
}

/// Held for the duration of a write action.
pub struct WriteActionGuard<'a> {
    guard: ReentrantMutexGuard<'a, Cell<u32>>,
}

impl WriteLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> WriteActionGuard<'_> {
        let guard = self.inner.lock();
        guard.set(guard.get() + 1);
        WriteActionGuard { guard }
    }

    /// Whether the calling thread is currently inside a write action.
    pub fn is_held_by_current_thread(&self) -> bool {
        // Another thread holding the lock makes `try_lock` fail; if we hold it
        // ourselves the re-entrant lock succeeds and the depth is non-zero.
        match self.inner.try_lock() {
            Some(guard) => guard.get() > 0,
            None => false,
        }
    }
}

impl WriteActionGuard<'_> {
    pub fn depth(&self) -> u32 {
        self.guard.get()
    }
}

impl Drop for WriteActionGuard<'_> {
    fn drop(&mut self) {
        self.guard.set(self.guard.get().saturating_sub(1));
    }
}

impl std::fmt::Debug for WriteLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteLock").finish_non_exhaustive()
    }
}
