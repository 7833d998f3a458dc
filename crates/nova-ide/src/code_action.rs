use lsp_types::{CodeAction, CodeActionKind, Command, Diagnostic, NumberOrString, Range, Uri};
use nova_core::{ClassKind, FileId, LineIndex, TextRange};
use serde::{Deserialize, Serialize};

use crate::create_class::UnresolvedReference;
use crate::messages;

pub const CREATE_CLASS_COMMAND: &str = "nova.createClass";

const UNRESOLVED_TYPE: &str = "unresolved-type";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassCommandArgs {
    pub uri: Uri,
    pub range: Range,
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub create_constructor: bool,
}

impl CreateClassCommandArgs {
    /// The reference the command was issued for, once the server has mapped `uri` to a file.
    pub fn reference(&self, file: FileId) -> UnresolvedReference {
        UnresolvedReference::new(self.name.clone(), file).with_kind(self.kind)
    }
}

/// Produces "Create class" code actions for `unresolved-type` diagnostics
/// intersecting `selection`.
///
/// The actions are surfaced as commands because the client has to ask the
/// user for a target package and directory before anything can be created.
pub fn create_class_code_actions(
    source: &str,
    uri: &Uri,
    selection: Range,
    diagnostics: &[Diagnostic],
) -> Vec<CodeAction> {
    let index = LineIndex::new(source);
    let Some(selection_span) = index.text_range(source, selection.into()) else {
        return Vec::new();
    };

    let mut actions = Vec::new();
    for diag in diagnostics {
        if !matches!(&diag.code, Some(NumberOrString::String(code)) if code == UNRESOLVED_TYPE) {
            continue;
        }
        let Some(diag_span) = index.text_range(source, diag.range.into()) else {
            continue;
        };
        if !spans_intersect(diag_span, selection_span) {
            continue;
        }

        let span_text = source
            .get(usize::from(diag_span.start())..usize::from(diag_span.end()))
            .unwrap_or_default();
        let name = if span_text.is_empty() {
            match unresolved_type_name(&diag.message) {
                Some(name) => name,
                None => continue,
            }
        } else {
            span_text
        };
        if !is_simple_type_identifier(name) {
            continue;
        }

        if actions
            .iter()
            .any(|action: &CodeAction| action.title == messages::create_class_text(name))
        {
            continue;
        }
        if let Some(action) = create_class_action(uri, diag.range, name, diag) {
            actions.push(action);
        }
    }
    actions
}

fn create_class_action(
    uri: &Uri,
    range: Range,
    name: &str,
    diag: &Diagnostic,
) -> Option<CodeAction> {
    let args = CreateClassCommandArgs {
        uri: uri.clone(),
        range,
        name: name.to_owned(),
        kind: ClassKind::Class,
        create_constructor: false,
    };
    let title = messages::create_class_text(name);

    Some(CodeAction {
        title: title.clone(),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![diag.clone()]),
        command: Some(Command {
            title,
            command: CREATE_CLASS_COMMAND.to_owned(),
            arguments: Some(vec![serde_json::to_value(args).ok()?]),
        }),
        ..Default::default()
    })
}

fn unresolved_type_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("unresolved type `")?;
    rest.strip_suffix('`')
}

fn is_simple_type_identifier(name: &str) -> bool {
    if name.contains('.') || name.contains('$') {
        return false;
    }

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first == '_' || first.is_ascii_alphabetic()) {
        return false;
    }
    chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
}

fn spans_intersect(a: TextRange, b: TextRange) -> bool {
    // A zero-length selection is a cursor; touching either end counts.
    if a.is_empty() {
        return b.start() <= a.start() && a.start() <= b.end();
    }
    if b.is_empty() {
        return a.start() <= b.start() && b.start() <= a.end();
    }
    a.start() < b.end() && b.start() < a.end()
}
