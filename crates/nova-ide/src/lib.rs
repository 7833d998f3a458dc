//! IDE-facing quick fixes.
//!
//! Quick fixes here are host-agnostic: they talk to the project model, the
//! template engine, dialogs and editors through the traits in [`host`], and
//! run their mutations through [`nova_scheduler::Scheduler`].

pub mod code_action;
pub mod create_class;
pub mod host;
pub mod intention;
pub mod messages;

pub use code_action::{create_class_code_actions, CreateClassCommandArgs, CREATE_CLASS_COMMAND};
pub use create_class::{
    create_class_fix, CreateClassFix, CreatedClassReport, InvokeOutcome, Navigation,
    UnresolvedReference,
};
pub use host::{
    ClassDecl, CodeModel, CreateClassDialog, CreationRequest, DialogOutcome, DialogRequest,
    EditorNavigator, HostError, HostServices, ImportManager, LanguageRoot, Messages,
    ModuleResolver, SourceFile, TemplateProperties, TemplateService,
};
pub use intention::{IntentionAction, InvocationContext};
