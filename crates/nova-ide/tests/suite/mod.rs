use std::sync::Arc;

use nova_config::CreateClassConfig;
use nova_core::FileId;
use nova_ide::{
    create_class_fix, CreateClassFix, HostServices, IntentionAction, InvocationContext,
    InvokeOutcome, UnresolvedReference,
};
use nova_test_utils::MemoryProject;

mod code_actions;
mod failures;
mod visibility;

/// A project plus the host services the fix runs against.
pub(crate) struct Fixture {
    pub project: Arc<MemoryProject>,
    pub host: HostServices,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(CreateClassConfig::default())
    }

    pub fn with_config(config: CreateClassConfig) -> Self {
        let project = MemoryProject::new();
        let host = project.services(config);
        Self { project, host }
    }

    pub fn invoke(&self, fix: &CreateClassFix, origin: FileId) -> InvokeOutcome {
        let file = self.project.source_file(origin);
        fix.invoke(&InvocationContext::new(&self.host, &file))
    }
}

pub(crate) fn fix_for(name: &str, origin: FileId) -> CreateClassFix {
    create_class_fix(UnresolvedReference::new(name, origin), false)
}

pub(crate) const MAIN: &str = "package com.acme\n\nclass Main {\n    Foo foo\n}\n";
