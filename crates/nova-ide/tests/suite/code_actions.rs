use lsp_types::{CodeActionKind, Diagnostic, DiagnosticSeverity, NumberOrString, Range, Uri};
use nova_core::FileId;
use nova_ide::{
    create_class_code_actions, create_class_fix, CreateClassCommandArgs, IntentionAction,
    UnresolvedReference, CREATE_CLASS_COMMAND,
};
use nova_test_utils::{offset_to_position, range_of};

const SOURCE: &str = "class A { MissingType x; }";

fn uri() -> Uri {
    "file:///A.groovy".parse().expect("valid uri")
}

fn unresolved_type(range: Range, name: &str) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(DiagnosticSeverity::ERROR),
        code: Some(NumberOrString::String("unresolved-type".to_string())),
        source: Some("nova".to_string()),
        message: format!("unresolved type `{name}`"),
        ..Diagnostic::default()
    }
}

fn command_args(action: &lsp_types::CodeAction) -> CreateClassCommandArgs {
    let command = action.command.as_ref().expect("expected a command");
    assert_eq!(command.command, CREATE_CLASS_COMMAND);
    let args = command.arguments.as_ref().expect("expected arguments");
    serde_json::from_value(args[0].clone()).expect("arguments deserialize")
}

#[test]
fn offers_create_class_command_for_unresolved_type() {
    let range = range_of(SOURCE, "MissingType");
    let actions =
        create_class_code_actions(SOURCE, &uri(), range, &[unresolved_type(range, "MissingType")]);

    assert_eq!(actions.len(), 1, "{actions:#?}");
    let action = &actions[0];
    assert_eq!(action.title, "Create class 'MissingType'");
    assert_eq!(action.kind, Some(CodeActionKind::QUICKFIX));
    assert!(action.edit.is_none(), "creation needs user input first");

    let args = command_args(action);
    assert_eq!(args.uri, uri());
    assert_eq!(args.range, range);
    assert_eq!(args.name, "MissingType");
    assert!(!args.create_constructor);

    let reference = args.reference(FileId::from_raw(7));
    assert_eq!(reference, UnresolvedReference::new("MissingType", FileId::from_raw(7)));
    assert_eq!(create_class_fix(reference, false).text(), action.title);
}

#[test]
fn is_filtered_by_selection_span() {
    let range = range_of(SOURCE, "MissingType");
    let selection = Range::new(offset_to_position(SOURCE, 0), offset_to_position(SOURCE, 1));

    let actions = create_class_code_actions(
        SOURCE,
        &uri(),
        selection,
        &[unresolved_type(range, "MissingType")],
    );

    assert!(actions.is_empty(), "{actions:#?}");
}

#[test]
fn cursor_at_end_of_name_still_matches() {
    let range = range_of(SOURCE, "MissingType");
    let cursor = Range::new(range.end, range.end);

    let actions =
        create_class_code_actions(SOURCE, &uri(), cursor, &[unresolved_type(range, "MissingType")]);

    assert_eq!(actions.len(), 1);
}

#[test]
fn qualified_names_and_other_diagnostics_are_skipped() {
    let source = "class A { a.b.Missing x; Other y; }";
    let qualified = range_of(source, "a.b.Missing");
    let other = range_of(source, "Other");
    let everything = Range::new(
        offset_to_position(source, 0),
        offset_to_position(source, source.len()),
    );

    let unused = Diagnostic {
        code: Some(NumberOrString::String("unused-import".to_string())),
        ..unresolved_type(other, "Other")
    };
    let actions = create_class_code_actions(
        source,
        &uri(),
        everything,
        &[unresolved_type(qualified, "a.b.Missing"), unused],
    );

    assert!(actions.is_empty(), "{actions:#?}");
}

#[test]
fn empty_diagnostic_range_falls_back_to_message() {
    let at = offset_to_position(SOURCE, SOURCE.find("MissingType").unwrap());
    let point = Range::new(at, at);

    let actions =
        create_class_code_actions(SOURCE, &uri(), point, &[unresolved_type(point, "Widget")]);

    assert_eq!(actions.len(), 1);
    assert_eq!(command_args(&actions[0]).name, "Widget");
}

#[test]
fn duplicate_diagnostics_produce_one_action() {
    let range = range_of(SOURCE, "MissingType");
    let diagnostic = unresolved_type(range, "MissingType");

    let actions =
        create_class_code_actions(SOURCE, &uri(), range, &[diagnostic.clone(), diagnostic]);

    assert_eq!(actions.len(), 1);
}
