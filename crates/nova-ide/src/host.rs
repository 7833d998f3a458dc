//! Collaborators the IDE layer borrows from its host.
//!
//! Everything the quick fixes need from the outside world (project model,
//! template engine, dialogs, the code model, editors) is reached through the
//! traits below. A language server wires them to real services; tests wire
//! them to `nova_test_utils::MemoryProject`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nova_config::CreateClassConfig;
use nova_core::{
    ClassKind, DirectoryId, FileId, ModuleId, PackageName, QualifiedName, TextRange, TextSize,
    Visibility,
};
use nova_scheduler::Scheduler;
use thiserror::Error;

/// Failure reported by a host collaborator.
#[derive(Debug, Error)]
pub enum HostError {
    /// The requested mutation is not valid for the current code model state.
    #[error("{0}")]
    IncorrectOperation(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unknown file template `{0}`")]
    UnknownTemplate(String),
    #[error("unknown file {0:?}")]
    UnknownFile(FileId),
    #[error("unknown directory {0:?}")]
    UnknownDirectory(DirectoryId),
    #[error("file `{0}` already exists")]
    FileExists(String),
}

/// The primary-language tree of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageRoot {
    /// A compilation unit with a (possibly empty) package declaration.
    CompilationUnit { file: FileId, package: PackageName },
    /// A script root; scripts have no package of their own.
    Script { file: FileId },
}

impl LanguageRoot {
    /// The file that owns this root. Imports are added here.
    pub fn file(&self) -> FileId {
        match self {
            LanguageRoot::CompilationUnit { file, .. } | LanguageRoot::Script { file } => *file,
        }
    }

    pub fn package(&self) -> PackageName {
        match self {
            LanguageRoot::CompilationUnit { package, .. } => package.clone(),
            LanguageRoot::Script { .. } => PackageName::root(),
        }
    }
}

/// A file as seen by quick fixes.
///
/// Plain source files return their own root. Composite documents (templates
/// embedding source code) return the root of the embedded code. Everything
/// else returns `None`.
pub trait SourceFile: Send + Sync {
    fn id(&self) -> FileId;

    fn language_root(&self) -> Option<LanguageRoot>;
}

pub trait ModuleResolver: Send + Sync {
    fn module_for_file(&self, file: FileId) -> Option<ModuleId>;
}

/// Properties handed to the template engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateProperties {
    pub name: String,
    pub package_name: PackageName,
}

impl TemplateProperties {
    pub fn new(name: impl Into<String>, package_name: PackageName) -> Self {
        Self {
            name: name.into(),
            package_name,
        }
    }

    /// `(key, value)` pairs using the template variable names.
    pub fn entries(&self) -> [(&'static str, &str); 2] {
        [
            ("NAME", self.name.as_str()),
            ("PACKAGE_NAME", self.package_name.as_str()),
        ]
    }
}

pub trait TemplateService: Send + Sync {
    /// Renders `template` into a new file named `file_name` inside `directory`.
    fn create_from_template(
        &self,
        directory: DirectoryId,
        name: &str,
        file_name: &str,
        template: &str,
        properties: &TemplateProperties,
    ) -> Result<FileId, HostError>;
}

/// What the create-class dialog is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub title: String,
    pub class_name: String,
    pub package: PackageName,
    pub module: Option<ModuleId>,
    pub kind: ClassKind,
    pub create_constructor: bool,
}

/// What the user confirmed in the create-class dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationRequest {
    pub target_directory: Option<DirectoryId>,
    pub package: PackageName,
    pub class_name: String,
    pub module: Option<ModuleId>,
    pub create_constructor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Cancelled,
    Confirmed(CreationRequest),
}

/// Modal dialog asking where the new class goes. Always shown from the UI domain.
pub trait CreateClassDialog: Send + Sync {
    fn show(&self, request: &DialogRequest) -> DialogOutcome;
}

/// A class-like declaration in the code model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub file: FileId,
    pub name: String,
    pub kind: ClassKind,
    /// `None` for classes without a stable qualified name.
    pub qualified_name: Option<QualifiedName>,
    /// `None` when the declaration has no modifier list.
    pub visibility: Option<Visibility>,
    pub range: TextRange,
}

/// The syntax/semantic layer.
pub trait CodeModel: Send + Sync {
    /// Top-level class-like declarations of `file`, in source order.
    fn class_declarations(&self, file: FileId) -> Result<Vec<ClassDecl>, HostError>;

    /// Whether code in `from` can reference `class` with the visibility recorded on `class`.
    fn is_accessible(&self, class: &ClassDecl, from: FileId) -> bool;

    fn set_visibility(&self, class: &ClassDecl, visibility: Visibility) -> Result<(), HostError>;

    fn add_default_constructor(&self, class: &ClassDecl) -> Result<(), HostError>;

    /// Durable location of `file`, if it has one.
    fn storage_path(&self, file: FileId) -> Option<PathBuf>;
}

pub trait ImportManager: Send + Sync {
    /// Adds `import <fqn>` to `file`. Adding an import twice is a no-op.
    fn add_import(&self, file: FileId, fqn: &QualifiedName) -> Result<(), HostError>;
}

pub trait EditorNavigator: Send + Sync {
    /// Opens (or reuses) an editor for `path` with the caret at `offset`.
    fn open_text_editor(&self, path: &Path, offset: TextSize, focus: bool)
        -> Result<(), HostError>;
}

pub trait Messages: Send + Sync {
    fn show_error_dialog(&self, message: &str, title: &str);
}

/// Everything a quick fix may call into.
#[derive(Clone)]
pub struct HostServices {
    pub modules: Arc<dyn ModuleResolver>,
    pub templates: Arc<dyn TemplateService>,
    pub dialog: Arc<dyn CreateClassDialog>,
    pub code_model: Arc<dyn CodeModel>,
    pub imports: Arc<dyn ImportManager>,
    pub navigator: Arc<dyn EditorNavigator>,
    pub messages: Arc<dyn Messages>,
    pub scheduler: Scheduler,
    pub config: CreateClassConfig,
}

impl HostServices {
    /// Services backed by a single object implementing every collaborator trait.
    pub fn from_host<H>(host: Arc<H>, scheduler: Scheduler, config: CreateClassConfig) -> Self
    where
        H: ModuleResolver
            + TemplateService
            + CreateClassDialog
            + CodeModel
            + ImportManager
            + EditorNavigator
            + Messages
            + 'static,
    {
        Self {
            modules: host.clone(),
            templates: host.clone(),
            dialog: host.clone(),
            code_model: host.clone(),
            imports: host.clone(),
            navigator: host.clone(),
            messages: host,
            scheduler,
            config,
        }
    }
}

impl fmt::Debug for HostServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostServices")
            .field("scheduler", &self.scheduler)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
