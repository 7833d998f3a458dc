use crossbeam_channel::{Receiver, Sender};

use nova_core::panic_payload_to_str;

pub type UiJob = Box<dyn FnOnce() + Send + 'static>;

/// FIFO of callbacks deferred to the UI domain.
///
/// Producers may enqueue from any thread; the host drains the queue from its
/// UI loop via [`UiQueue::run_pending`].
#[derive(Clone)]
pub struct UiQueue {
    tx: Sender<UiJob>,
    rx: Receiver<UiJob>,
}

impl UiQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    pub fn push(&self, job: UiJob) {
        // Both ends live in `self`, so the channel cannot be disconnected here.
        let _ = self.tx.send(job);
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Runs every job queued so far, including jobs queued by those jobs.
    ///
    /// A panicking job is logged and does not prevent the rest from running.
    /// Returns the number of jobs executed.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            ran += 1;
            if let Err(panic) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
                tracing::error!(
                    target: "nova.scheduler",
                    panic = %panic_payload_to_str(&*panic),
                    "deferred UI job panicked"
                );
            }
        }
        ran
    }
}

impl Default for UiQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UiQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiQueue")
            .field("pending", &self.len())
            .finish()
    }
}
