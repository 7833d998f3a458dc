//! "Create class" quick fix for unresolved type references.
//!
//! The fix asks the user where the class should go, renders a file template
//! there, makes the new class visible from the reference site, imports it,
//! and moves the caret to it. Creation runs inside a single write action;
//! the dialog runs before it, and error reporting is deferred to the UI queue.

use std::path::PathBuf;

use nova_config::VisibilityPolicy;
use nova_core::{ClassKind, DirectoryId, FileId, PackageName, QualifiedName, TextSize, Visibility};
use thiserror::Error;

use crate::host::{
    ClassDecl, CreationRequest, DialogOutcome, DialogRequest, HostError, HostServices,
    LanguageRoot, TemplateProperties,
};
use crate::intention::{IntentionAction, InvocationContext};
use crate::messages;

/// A reference the resolver could not bind to any class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub name: String,
    pub kind: ClassKind,
    /// File containing the reference. The fix only runs from this file.
    pub file: FileId,
}

impl UnresolvedReference {
    pub fn new(name: impl Into<String>, file: FileId) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            file,
        }
    }

    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Result of [`CreateClassFix::invoke`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeOutcome {
    /// The file has no primary-language root, or the fix was invoked from a
    /// context where it must not run.
    NotApplicable,
    /// The user dismissed the dialog or picked no directory.
    Cancelled,
    /// Creation failed; the failure has been reported or logged.
    Failed,
    Created(CreatedClassReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedClassReport {
    pub class: ClassDecl,
    /// Set when the class had to be made more visible.
    pub visibility_changed: Option<Visibility>,
    pub constructor_added: bool,
    /// The import added to the reference's file, if any.
    pub import_added: Option<QualifiedName>,
    pub navigation: Navigation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Opened { path: PathBuf, offset: TextSize },
    /// The new file has no durable storage.
    Skipped,
    Failed,
}

#[derive(Debug, Error)]
enum CreateClassError {
    #[error("class creation cancelled")]
    Cancelled,
    #[error("{message}")]
    NoClassInTemplate { name: String, message: String },
    #[error(transparent)]
    Host(#[from] HostError),
}

struct Created {
    class: ClassDecl,
    visibility_changed: Option<Visibility>,
    constructor_added: bool,
    import_added: Option<QualifiedName>,
}

/// Builds the fix for `reference`.
///
/// `create_constructor` pre-selects constructor generation in the dialog.
pub fn create_class_fix(
    reference: UnresolvedReference,
    create_constructor: bool,
) -> CreateClassFix {
    CreateClassFix {
        reference,
        create_constructor,
    }
}

#[derive(Debug, Clone)]
pub struct CreateClassFix {
    reference: UnresolvedReference,
    create_constructor: bool,
}

impl CreateClassFix {
    pub fn reference(&self) -> &UnresolvedReference {
        &self.reference
    }

    /// The language root of the reference's file, if `ctx` was invoked from it.
    fn reference_root(&self, ctx: &InvocationContext<'_>) -> Option<LanguageRoot> {
        if ctx.file.id() != self.reference.file {
            return None;
        }
        ctx.file.language_root()
    }

    fn create(
        &self,
        host: &HostServices,
        origin: FileId,
        current_package: &PackageName,
        request: &CreationRequest,
        directory: DirectoryId,
    ) -> Result<Created, CreateClassError> {
        let config = &host.config;
        let name = request.class_name.as_str();
        if name.is_empty() {
            return Err(CreateClassError::Cancelled);
        }

        let template = config.template_for(self.reference.kind);
        let file_name = config.file_name_for(name);
        let properties = TemplateProperties::new(name, request.package.clone());

        let file = match host.templates.create_from_template(
            directory,
            name,
            &file_name,
            template,
            &properties,
        ) {
            Ok(file) => file,
            Err(HostError::IncorrectOperation(message)) => {
                return Err(CreateClassError::NoClassInTemplate {
                    name: name.to_owned(),
                    message,
                })
            }
            Err(err) => return Err(err.into()),
        };

        let Some(class) = host.code_model.class_declarations(file)?.into_iter().next() else {
            return Err(CreateClassError::NoClassInTemplate {
                name: name.to_owned(),
                message: messages::no_class_in_file_template().to_owned(),
            });
        };
        tracing::debug!(
            target: "nova.ide",
            class = %class.name,
            file = file.to_raw(),
            template,
            "created class from template"
        );

        let visibility_changed = match required_visibility(host, &class, origin) {
            Some(visibility) => {
                host.code_model.set_visibility(&class, visibility)?;
                Some(visibility)
            }
            None => None,
        };

        let constructor_added = request.create_constructor && class.kind == ClassKind::Class;
        if constructor_added {
            host.code_model.add_default_constructor(&class)?;
        }

        // Mutations shift offsets; read the declaration back.
        let reread = host
            .code_model
            .class_declarations(file)?
            .into_iter()
            .find(|decl| decl.name == class.name);
        let class = match reread {
            Some(class) => class,
            None => {
                tracing::warn!(
                    target: "nova.ide",
                    class = %class.name,
                    file = file.to_raw(),
                    "created class not found after edits; caret may be misplaced"
                );
                class
            }
        };

        let import_added = match class.qualified_name.as_ref() {
            Some(fqn) if needs_import(fqn, current_package) => {
                match host.imports.add_import(origin, fqn) {
                    Ok(()) => Some(fqn.clone()),
                    Err(err) => {
                        tracing::warn!(
                            target: "nova.ide",
                            fqn = %fqn,
                            error = %err,
                            "failed to import created class"
                        );
                        None
                    }
                }
            }
            _ => None,
        };

        Ok(Created {
            class,
            visibility_changed,
            constructor_added,
            import_added,
        })
    }

    fn report_failure(&self, host: &HostServices, err: CreateClassError) -> InvokeOutcome {
        match err {
            CreateClassError::Cancelled => InvokeOutcome::Cancelled,
            CreateClassError::NoClassInTemplate { name, message } => {
                tracing::debug!(
                    target: "nova.ide",
                    class = %name,
                    %message,
                    "template produced no class"
                );
                let dialogs = host.messages.clone();
                host.scheduler.invoke_later(move || {
                    dialogs.show_error_dialog(
                        &messages::cannot_create_class_error_text(&name, &message),
                        messages::cannot_create_class_error_title(),
                    );
                });
                InvokeOutcome::Failed
            }
            CreateClassError::Host(err) => {
                tracing::error!(
                    target: "nova.ide",
                    class = %self.reference.name,
                    error = %err,
                    "failed to create class"
                );
                InvokeOutcome::Failed
            }
        }
    }
}

/// The visibility `class` must be given to be usable from `from`, if any.
///
/// Only levels strictly wider than the current one are returned.
fn required_visibility(host: &HostServices, class: &ClassDecl, from: FileId) -> Option<Visibility> {
    let current = class.visibility?;
    if current == Visibility::Public || host.code_model.is_accessible(class, from) {
        return None;
    }

    match host.config.visibility {
        VisibilityPolicy::Public => Some(Visibility::Public),
        VisibilityPolicy::Minimal => current
            .wider()
            .find(|candidate| {
                let widened = ClassDecl {
                    visibility: Some(*candidate),
                    ..class.clone()
                };
                host.code_model.is_accessible(&widened, from)
            })
            .or(Some(Visibility::Public)),
    }
}

fn needs_import(fqn: &QualifiedName, current_package: &PackageName) -> bool {
    match fqn.package() {
        Some(package) => package != *current_package,
        None => false,
    }
}

impl IntentionAction for CreateClassFix {
    fn text(&self) -> String {
        messages::create_class_text(&self.reference.name)
    }

    fn family_name(&self) -> String {
        messages::create_class_family_name().to_owned()
    }

    fn is_available(&self, ctx: &InvocationContext<'_>) -> bool {
        self.reference_root(ctx).is_some()
    }

    fn invoke(&self, ctx: &InvocationContext<'_>) -> InvokeOutcome {
        let Some(root) = self.reference_root(ctx) else {
            return InvokeOutcome::NotApplicable;
        };
        let host = ctx.host;

        if host.scheduler.is_write_action_active() {
            tracing::error!(
                target: "nova.ide",
                class = %self.reference.name,
                "create class dialog requested inside a write action"
            );
            return InvokeOutcome::NotApplicable;
        }

        let origin = root.file();
        let current_package = root.package();
        let dialog = DialogRequest {
            title: messages::create_class_family_name().to_owned(),
            class_name: self.reference.name.clone(),
            package: current_package.clone(),
            module: host.modules.module_for_file(ctx.file.id()),
            kind: self.reference.kind,
            create_constructor: self.create_constructor,
        };

        let request = match host.dialog.show(&dialog) {
            DialogOutcome::Cancelled => return InvokeOutcome::Cancelled,
            DialogOutcome::Confirmed(request) => request,
        };
        let Some(directory) = request.target_directory else {
            tracing::debug!(
                target: "nova.ide",
                "create class dialog confirmed without a directory"
            );
            return InvokeOutcome::Cancelled;
        };

        let created = host.scheduler.run_write_action(|| {
            self.create(host, origin, &current_package, &request, directory)
        });
        let created = match created {
            Ok(created) => created,
            Err(err) => return self.report_failure(host, err),
        };

        let navigation = match host.code_model.storage_path(created.class.file) {
            None => Navigation::Skipped,
            Some(path) => {
                let offset = created.class.range.start();
                match host.navigator.open_text_editor(&path, offset, true) {
                    Ok(()) => Navigation::Opened { path, offset },
                    Err(err) => {
                        tracing::warn!(
                            target: "nova.ide",
                            path = %path.display(),
                            error = %err,
                            "failed to open created class"
                        );
                        Navigation::Failed
                    }
                }
            }
        };

        InvokeOutcome::Created(CreatedClassReport {
            class: created.class,
            visibility_changed: created.visibility_changed,
            constructor_added: created.constructor_added,
            import_added: created.import_added,
            navigation,
        })
    }

    fn start_in_write_action(&self) -> bool {
        // Shows a modal dialog first and opens its own write action afterwards.
        false
    }
}
