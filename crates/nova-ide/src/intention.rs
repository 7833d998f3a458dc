//! The contract between diagnostics and the quick fixes they offer.

use crate::create_class::InvokeOutcome;
use crate::host::{HostServices, SourceFile};

/// Where a quick fix runs: the host and the file the user invoked it from.
#[derive(Clone, Copy)]
pub struct InvocationContext<'a> {
    pub host: &'a HostServices,
    pub file: &'a dyn SourceFile,
}

impl<'a> InvocationContext<'a> {
    pub fn new(host: &'a HostServices, file: &'a dyn SourceFile) -> Self {
        Self { host, file }
    }
}

/// A user-triggered fix attached to a diagnostic.
pub trait IntentionAction: Send + Sync {
    /// Menu text for this particular fix.
    fn text(&self) -> String;

    /// Text shared by all fixes of this family.
    fn family_name(&self) -> String;

    /// Cheap applicability check. Must not touch the file system.
    fn is_available(&self, ctx: &InvocationContext<'_>) -> bool;

    fn invoke(&self, ctx: &InvocationContext<'_>) -> InvokeOutcome;

    /// Whether the caller should wrap `invoke` in a write action.
    fn start_in_write_action(&self) -> bool;
}
