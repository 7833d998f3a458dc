use crate::{UiJob, UiQueue, WriteLock};

/// Per-project handle onto the UI domain and the write lock.
///
/// Cheap to clone; clones share the queue and the lock.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    ui: UiQueue,
    write_lock: WriteLock,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` inside a write action, serialized with every other write action
    /// of this project.
    pub fn run_write_action<T>(&self, f: impl FnOnce() -> T) -> T {
        let guard = self.write_lock.acquire();
        tracing::trace!(
            target: "nova.scheduler",
            depth = guard.depth(),
            "write action started"
        );
        let result = f();
        drop(guard);
        result
    }

    pub fn is_write_action_active(&self) -> bool {
        self.write_lock.is_held_by_current_thread()
    }

    /// Queue `job` for the UI domain. It runs on the next [`Scheduler::pump_ui`]
    /// outside any write action.
    pub fn invoke_later(&self, job: impl FnOnce() + Send + 'static) {
        let job: UiJob = Box::new(job);
        self.ui.push(job);
    }

    pub fn pending_ui_jobs(&self) -> usize {
        self.ui.len()
    }

    /// Drain the UI queue. Called by the host's UI loop.
    ///
    /// Does nothing (returns 0) while a write action is active on this thread;
    /// the jobs stay queued until the scope has ended.
    pub fn pump_ui(&self) -> usize {
        if self.is_write_action_active() {
            tracing::debug!(
                target: "nova.scheduler",
                pending = self.ui.len(),
                "not pumping UI queue inside a write action"
            );
            return 0;
        }
        self.ui.run_pending()
    }
}
