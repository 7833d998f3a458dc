//! Execution domains for IDE actions.
//!
//! Nova distinguishes two contexts an action may need:
//! - the **UI domain**, where modal input is collected and where deferred
//!   callbacks ([`Scheduler::invoke_later`]) run when the host pumps the queue;
//! - **write actions** ([`Scheduler::run_write_action`]), atomic mutation scopes
//!   that are mutually exclusive per project.
//!
//! UI work must never run while a write action is active on the same thread;
//! the queue refuses to pump inside one.

mod scheduler;
mod ui;
mod write;

pub use scheduler::Scheduler;
pub use ui::{UiJob, UiQueue};
pub use write::{WriteActionGuard, WriteLock};
