use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nova_config::CreateClassConfig;
use nova_core::{
    DirectoryId, FileId, ModuleId, PackageName, QualifiedName, TextEdit, TextSize, Visibility,
};
use nova_ide::{
    ClassDecl, CodeModel, CreateClassDialog, CreationRequest, DialogOutcome, DialogRequest,
    EditorNavigator, HostError, HostServices, ImportManager, LanguageRoot, Messages,
    ModuleResolver, SourceFile, TemplateProperties, TemplateService,
};
use nova_scheduler::Scheduler;
use parking_lot::{Mutex, MutexGuard};

/// Default templates, keyed by the template names `CreateClassConfig` uses.
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (
        "GroovyClass.groovy",
        "package ${PACKAGE_NAME}\n\nclass ${NAME} {\n}\n",
    ),
    (
        "GroovyInterface.groovy",
        "package ${PACKAGE_NAME}\n\ninterface ${NAME} {\n}\n",
    ),
    (
        "GroovyEnum.groovy",
        "package ${PACKAGE_NAME}\n\nenum ${NAME} {\n}\n",
    ),
    (
        "GroovyAnnotation.groovy",
        "package ${PACKAGE_NAME}\n\n@interface ${NAME} {\n}\n",
    ),
];

/// How a file exposes source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A compilation unit; its package comes from its `package` declaration.
    Source,
    /// A composite document (e.g. a server page) wrapping embedded code.
    Embedded,
    /// A script without a package.
    Script,
    /// No language root at all.
    PlainText,
}

/// Scripted answer of the create-class dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogScript {
    Cancel,
    Confirm {
        directory: Option<DirectoryId>,
        /// Overrides the pre-filled class name.
        class_name: Option<String>,
        /// Overrides the pre-selected constructor flag.
        create_constructor: Option<bool>,
    },
}

impl DialogScript {
    pub fn confirm(directory: DirectoryId) -> Self {
        DialogScript::Confirm {
            directory: Some(directory),
            class_name: None,
            create_constructor: None,
        }
    }

    pub fn confirm_without_directory() -> Self {
        DialogScript::Confirm {
            directory: None,
            class_name: None,
            create_constructor: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOpen {
    pub path: PathBuf,
    pub offset: TextSize,
    pub focus: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub message: String,
    pub title: String,
}

#[derive(Debug)]
struct MemoryFile {
    name: String,
    directory: Option<DirectoryId>,
    kind: FileKind,
    text: String,
    path: Option<PathBuf>,
    module: Option<ModuleId>,
}

#[derive(Debug)]
struct MemoryDirectory {
    package: PackageName,
    path: Option<PathBuf>,
    module: Option<ModuleId>,
}

#[derive(Debug)]
struct State {
    next_file: u32,
    next_directory: u32,
    files: BTreeMap<FileId, MemoryFile>,
    directories: BTreeMap<DirectoryId, MemoryDirectory>,
    templates: BTreeMap<String, String>,
    dialog: DialogScript,
    fail_next_creation: Option<HostError>,
    fail_next_import: Option<HostError>,
    fail_next_open: Option<HostError>,
    sealed_packages: BTreeSet<PackageName>,
    rewrite_after_next_edit: Option<String>,

    host_calls: usize,
    dialog_requests: Vec<DialogRequest>,
    imports: Vec<(FileId, QualifiedName)>,
    editor_opens: Vec<EditorOpen>,
    error_dialogs: Vec<ErrorDialog>,
    affinity_violations: Vec<String>,
}

/// In-memory project implementing every host collaborator.
///
/// Mutations are checked against the scheduler: file changes outside a write
/// action, or dialogs inside one, are recorded as affinity violations.
#[derive(Debug)]
pub struct MemoryProject {
    scheduler: Scheduler,
    state: Mutex<State>,
}

impl Default for MemoryProject {
    fn default() -> Self {
        let templates = DEFAULT_TEMPLATES
            .iter()
            .map(|(name, text)| ((*name).to_owned(), (*text).to_owned()))
            .collect();

        Self {
            scheduler: Scheduler::new(),
            state: Mutex::new(State {
                next_file: 0,
                next_directory: 0,
                files: BTreeMap::new(),
                directories: BTreeMap::new(),
                templates,
                dialog: DialogScript::Cancel,
                fail_next_creation: None,
                fail_next_import: None,
                fail_next_open: None,
                sealed_packages: BTreeSet::new(),
                rewrite_after_next_edit: None,
                host_calls: 0,
                dialog_requests: Vec::new(),
                imports: Vec::new(),
                editor_opens: Vec::new(),
                error_dialogs: Vec::new(),
                affinity_violations: Vec::new(),
            }),
        }
    }
}

impl MemoryProject {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn scheduler(&self) -> Scheduler {
        self.scheduler.clone()
    }

    /// Host services backed by this project and its scheduler.
    pub fn services(self: &Arc<Self>, config: CreateClassConfig) -> HostServices {
        HostServices::from_host(self.clone(), self.scheduler.clone(), config)
    }

    /// A source directory for `package`, stored under `/src/<package path>`.
    pub fn add_directory(&self, package: &str) -> DirectoryId {
        let package = PackageName::parse(package).expect("valid package name");
        let mut path = PathBuf::from("/src");
        path.extend(package.segments());
        self.insert_directory(package, Some(path))
    }

    /// A directory whose files have no durable storage.
    pub fn add_directory_without_storage(&self, package: &str) -> DirectoryId {
        let package = PackageName::parse(package).expect("valid package name");
        self.insert_directory(package, None)
    }

    fn insert_directory(&self, package: PackageName, path: Option<PathBuf>) -> DirectoryId {
        let mut state = self.state.lock();
        let id = DirectoryId::from_raw(state.next_directory);
        state.next_directory += 1;
        state.directories.insert(
            id,
            MemoryDirectory {
                package,
                path,
                module: Some(ModuleId::from_raw(0)),
            },
        );
        id
    }

    /// Adds a file to `directory`. Its storage path follows the directory's.
    pub fn add_file(
        &self,
        directory: DirectoryId,
        name: &str,
        kind: FileKind,
        text: &str,
    ) -> FileId {
        let mut state = self.state.lock();
        let dir = state
            .directories
            .get(&directory)
            .expect("directory registered with add_directory");
        let path = dir.path.as_ref().map(|dir| dir.join(name));
        let module = dir.module;
        insert_file(&mut state, Some(directory), name, kind, text, path, module)
    }

    pub fn set_template(&self, name: &str, text: &str) {
        self.state
            .lock()
            .templates
            .insert(name.to_owned(), text.to_owned());
    }

    pub fn set_dialog(&self, script: DialogScript) {
        self.state.lock().dialog = script;
    }

    /// Makes the next `create_from_template` call fail with `err`.
    pub fn fail_next_creation(&self, err: HostError) {
        self.state.lock().fail_next_creation = Some(err);
    }

    /// Hides every class of `package` from other packages, whatever its visibility.
    pub fn seal_package(&self, package: &str) {
        let package = PackageName::parse(package).expect("valid package name");
        self.state.lock().sealed_packages.insert(package);
    }

    /// After the next class edit, replaces the edited file's text with `text`,
    /// as if another writer had changed it in between.
    pub fn rewrite_after_next_edit(&self, text: &str) {
        self.state.lock().rewrite_after_next_edit = Some(text.to_owned());
    }

    /// Makes the next `add_import` call fail with `err`.
    pub fn fail_next_import(&self, err: HostError) {
        self.state.lock().fail_next_import = Some(err);
    }

    /// Makes the next `open_text_editor` call fail with `err`.
    pub fn fail_next_open(&self, err: HostError) {
        self.state.lock().fail_next_open = Some(err);
    }

    /// Snapshot of `file` as the quick fix sees it.
    pub fn source_file(&self, file: FileId) -> MemorySourceFile {
        let state = self.state.lock();
        let entry = state.files.get(&file).expect("file registered with add_file");
        MemorySourceFile {
            id: file,
            kind: entry.kind,
            text: entry.text.clone(),
        }
    }

    pub fn text(&self, file: FileId) -> Option<String> {
        self.state.lock().files.get(&file).map(|f| f.text.clone())
    }

    /// Files named `name` in `directory`.
    pub fn find_file(&self, directory: DirectoryId, name: &str) -> Option<FileId> {
        let state = self.state.lock();
        find_file(&state, directory, name)
    }

    pub fn file_count(&self) -> usize {
        self.state.lock().files.len()
    }

    /// Number of calls made into any collaborator trait.
    pub fn host_calls(&self) -> usize {
        self.state.lock().host_calls
    }

    pub fn dialog_requests(&self) -> Vec<DialogRequest> {
        self.state.lock().dialog_requests.clone()
    }

    pub fn imports(&self) -> Vec<(FileId, QualifiedName)> {
        self.state.lock().imports.clone()
    }

    pub fn editor_opens(&self) -> Vec<EditorOpen> {
        self.state.lock().editor_opens.clone()
    }

    pub fn error_dialogs(&self) -> Vec<ErrorDialog> {
        self.state.lock().error_dialogs.clone()
    }

    pub fn affinity_violations(&self) -> Vec<String> {
        self.state.lock().affinity_violations.clone()
    }

    /// Locks the state for one collaborator call.
    ///
    /// `needs_write_action`: `Some(true)` for mutations, `Some(false)` for UI
    /// work, `None` for reads allowed anywhere.
    fn enter(&self, operation: &str, needs_write_action: Option<bool>) -> MutexGuard<'_, State> {
        let in_write_action = self.scheduler.is_write_action_active();
        let mut state = self.state.lock();
        state.host_calls += 1;
        match needs_write_action {
            Some(true) if !in_write_action => state
                .affinity_violations
                .push(format!("{operation} outside a write action")),
            Some(false) if in_write_action => state
                .affinity_violations
                .push(format!("{operation} inside a write action")),
            _ => {}
        }
        state
    }

    fn edit_class(
        &self,
        operation: &str,
        class: &ClassDecl,
        edit: impl FnOnce(&str, &nova_syntax::ClassDeclaration) -> Option<TextEdit>,
    ) -> Result<(), HostError> {
        let mut state = self.enter(operation, Some(true));
        let rewrite = state.rewrite_after_next_edit.take();
        let file = state
            .files
            .get_mut(&class.file)
            .ok_or(HostError::UnknownFile(class.file))?;
        let decl = nova_syntax::class_declarations(&file.text)
            .into_iter()
            .find(|decl| decl.name == class.name)
            .ok_or_else(|| {
                HostError::IncorrectOperation(format!("class `{}` not found", class.name))
            })?;
        if let Some(edit) = edit(&file.text, &decl) {
            file.text = apply_edit(&file.text, edit)?;
        }
        if let Some(text) = rewrite {
            file.text = text;
        }
        Ok(())
    }
}

fn insert_file(
    state: &mut State,
    directory: Option<DirectoryId>,
    name: &str,
    kind: FileKind,
    text: &str,
    path: Option<PathBuf>,
    module: Option<ModuleId>,
) -> FileId {
    let id = FileId::from_raw(state.next_file);
    state.next_file += 1;
    state.files.insert(
        id,
        MemoryFile {
            name: name.to_owned(),
            directory,
            kind,
            text: text.to_owned(),
            path,
            module,
        },
    );
    id
}

fn find_file(state: &State, directory: DirectoryId, name: &str) -> Option<FileId> {
    state
        .files
        .iter()
        .find(|(_, file)| file.directory == Some(directory) && file.name == name)
        .map(|(id, _)| *id)
}

fn apply_edit(text: &str, edit: TextEdit) -> Result<String, HostError> {
    edit.apply(text).map_err(|err| HostError::IncorrectOperation(err.to_string()))
}

/// Substitutes `${KEY}` variables and drops a `package` line left empty.
fn render_template(template: &str, properties: &TemplateProperties) -> String {
    let mut text = template.to_owned();
    for (key, value) in properties.entries() {
        text = text.replace(&format!("${{{key}}}"), value);
    }

    let mut out = String::with_capacity(text.len());
    let mut skip_blank = false;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed == "package" || trimmed == "package;" {
            skip_blank = true;
            continue;
        }
        if skip_blank && trimmed.is_empty() {
            skip_blank = false;
            continue;
        }
        skip_blank = false;
        out.push_str(line);
    }
    out
}

fn file_package(file: &MemoryFile) -> PackageName {
    match file.kind {
        FileKind::Source => nova_syntax::package_declaration(&file.text)
            .map(|decl| decl.name)
            .unwrap_or_default(),
        FileKind::Embedded | FileKind::Script | FileKind::PlainText => PackageName::root(),
    }
}

impl ModuleResolver for MemoryProject {
    fn module_for_file(&self, file: FileId) -> Option<ModuleId> {
        let state = self.enter("module_for_file", None);
        state.files.get(&file).and_then(|f| f.module)
    }
}

impl TemplateService for MemoryProject {
    fn create_from_template(
        &self,
        directory: DirectoryId,
        name: &str,
        file_name: &str,
        template: &str,
        properties: &TemplateProperties,
    ) -> Result<FileId, HostError> {
        let mut state = self.enter("create_from_template", Some(true));
        if let Some(err) = state.fail_next_creation.take() {
            return Err(err);
        }

        let dir = state
            .directories
            .get(&directory)
            .ok_or(HostError::UnknownDirectory(directory))?;
        let path = dir.path.as_ref().map(|dir| dir.join(file_name));
        let module = dir.module;
        let template_text = state
            .templates
            .get(template)
            .ok_or_else(|| HostError::UnknownTemplate(template.to_owned()))?;
        let text = render_template(template_text, properties);

        if find_file(&state, directory, file_name).is_some() {
            return Err(HostError::FileExists(file_name.to_owned()));
        }

        tracing::trace!(
            target: "nova.test_utils",
            name,
            file_name,
            template,
            "rendering template"
        );
        Ok(insert_file(
            &mut state,
            Some(directory),
            file_name,
            FileKind::Source,
            &text,
            path,
            module,
        ))
    }
}

impl CreateClassDialog for MemoryProject {
    fn show(&self, request: &DialogRequest) -> DialogOutcome {
        let mut state = self.enter("create class dialog", Some(false));
        state.dialog_requests.push(request.clone());

        match state.dialog.clone() {
            DialogScript::Cancel => DialogOutcome::Cancelled,
            DialogScript::Confirm {
                directory,
                class_name,
                create_constructor,
            } => {
                let dir = directory.and_then(|id| state.directories.get(&id));
                DialogOutcome::Confirmed(CreationRequest {
                    target_directory: directory,
                    package: dir
                        .map(|dir| dir.package.clone())
                        .unwrap_or_else(|| request.package.clone()),
                    class_name: class_name.unwrap_or_else(|| request.class_name.clone()),
                    module: dir.and_then(|dir| dir.module).or(request.module),
                    create_constructor: create_constructor.unwrap_or(request.create_constructor),
                })
            }
        }
    }
}

impl CodeModel for MemoryProject {
    fn class_declarations(&self, file: FileId) -> Result<Vec<ClassDecl>, HostError> {
        let state = self.enter("class_declarations", None);
        let entry = state.files.get(&file).ok_or(HostError::UnknownFile(file))?;
        if entry.kind != FileKind::Source {
            return Ok(Vec::new());
        }

        let package = file_package(entry);
        Ok(nova_syntax::class_declarations(&entry.text)
            .into_iter()
            .map(|decl| ClassDecl {
                file,
                qualified_name: Some(package.qualify(&decl.name)),
                name: decl.name,
                kind: decl.kind,
                visibility: Some(decl.visibility),
                range: decl.range,
            })
            .collect())
    }

    fn is_accessible(&self, class: &ClassDecl, from: FileId) -> bool {
        let state = self.enter("is_accessible", None);
        let Some(from_file) = state.files.get(&from) else {
            return false;
        };
        let class_package = class
            .qualified_name
            .as_ref()
            .map(|fqn| fqn.package().unwrap_or_default());
        let same_package = class_package.as_ref() == Some(&file_package(from_file));
        if !same_package
            && class_package.is_some_and(|package| state.sealed_packages.contains(&package))
        {
            return false;
        }

        // Top-level classes: no subclass relation exists yet, so `protected`
        // behaves like package-private.
        match class.visibility {
            None | Some(Visibility::Public) => true,
            Some(Visibility::Protected) | Some(Visibility::PackagePrivate) => same_package,
            Some(Visibility::Private) => class.file == from,
        }
    }

    fn set_visibility(&self, class: &ClassDecl, visibility: Visibility) -> Result<(), HostError> {
        self.edit_class("set_visibility", class, |text, decl| {
            nova_syntax::set_visibility_edit(text, decl, visibility)
        })
    }

    fn add_default_constructor(&self, class: &ClassDecl) -> Result<(), HostError> {
        self.edit_class("add_default_constructor", class, nova_syntax::default_constructor_edit)
    }

    fn storage_path(&self, file: FileId) -> Option<PathBuf> {
        let state = self.enter("storage_path", None);
        state.files.get(&file).and_then(|f| f.path.clone())
    }
}

impl ImportManager for MemoryProject {
    fn add_import(&self, file: FileId, fqn: &QualifiedName) -> Result<(), HostError> {
        let mut state = self.enter("add_import", Some(true));
        if let Some(err) = state.fail_next_import.take() {
            return Err(err);
        }
        state.imports.push((file, fqn.clone()));
        let entry = state.files.get_mut(&file).ok_or(HostError::UnknownFile(file))?;
        if let Some(edit) = nova_syntax::import_edit(&entry.text, fqn) {
            entry.text = apply_edit(&entry.text, edit)?;
        }
        Ok(())
    }
}

impl EditorNavigator for MemoryProject {
    fn open_text_editor(
        &self,
        path: &Path,
        offset: TextSize,
        focus: bool,
    ) -> Result<(), HostError> {
        let mut state = self.enter("open_text_editor", Some(false));
        if let Some(err) = state.fail_next_open.take() {
            return Err(err);
        }
        state.editor_opens.push(EditorOpen {
            path: path.to_path_buf(),
            offset,
            focus,
        });
        Ok(())
    }
}

impl Messages for MemoryProject {
    fn show_error_dialog(&self, message: &str, title: &str) {
        let mut state = self.enter("error dialog", Some(false));
        state.error_dialogs.push(ErrorDialog {
            message: message.to_owned(),
            title: title.to_owned(),
        });
    }
}

/// A file snapshot handed to quick fixes as their invocation file.
#[derive(Debug, Clone)]
pub struct MemorySourceFile {
    id: FileId,
    kind: FileKind,
    text: String,
}

impl SourceFile for MemorySourceFile {
    fn id(&self) -> FileId {
        self.id
    }

    fn language_root(&self) -> Option<LanguageRoot> {
        match self.kind {
            FileKind::Source => Some(LanguageRoot::CompilationUnit {
                file: self.id,
                package: nova_syntax::package_declaration(&self.text)
                    .map(|decl| decl.name)
                    .unwrap_or_default(),
            }),
            FileKind::Embedded | FileKind::Script => Some(LanguageRoot::Script { file: self.id }),
            FileKind::PlainText => None,
        }
    }
}
