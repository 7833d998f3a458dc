use std::io;

use nova_config::NovaConfig;
use nova_ide::{HostError, IntentionAction, InvocationContext, InvokeOutcome, Navigation};
use nova_test_utils::{capture_logs, DialogScript, ErrorDialog, FileKind};
use pretty_assertions::assert_eq;

use super::{fix_for, Fixture, MAIN};

#[test]
fn template_without_class_reports_error_dialog_later() {
    let fixture = Fixture::new();
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let util = project.add_directory("com.acme.util");
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    project.set_template("GroovyClass.groovy", "// nothing to see here\n");
    project.set_dialog(DialogScript::confirm(util));

    let outcome = fixture.invoke(&fix_for("Foo", main), main);

    assert_eq!(outcome, InvokeOutcome::Failed);
    // The file produced by the template is kept.
    assert!(project.find_file(util, "Foo.groovy").is_some());
    assert!(project.imports().is_empty());
    assert!(project.editor_opens().is_empty());

    // Deferred to the UI domain.
    assert!(project.error_dialogs().is_empty());
    let scheduler = project.scheduler();
    assert_eq!(scheduler.pending_ui_jobs(), 1);
    assert_eq!(scheduler.pump_ui(), 1);

    assert_eq!(
        project.error_dialogs(),
        vec![ErrorDialog {
            message: "Cannot create class 'Foo': No class found in file template".to_owned(),
            title: "Cannot Create Class".to_owned(),
        }]
    );
    assert!(project.affinity_violations().is_empty());
}

#[test]
fn incorrect_operation_from_template_engine_is_shown_to_user() {
    let fixture = Fixture::new();
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    project.set_dialog(DialogScript::confirm(acme));
    project.fail_next_creation(HostError::IncorrectOperation(
        "Template is malformed".to_owned(),
    ));

    let outcome = fixture.invoke(&fix_for("Foo", main), main);

    assert_eq!(outcome, InvokeOutcome::Failed);
    assert_eq!(project.file_count(), 1);
    project.scheduler().pump_ui();
    assert_eq!(
        project.error_dialogs(),
        vec![ErrorDialog {
            message: "Cannot create class 'Foo': Template is malformed".to_owned(),
            title: "Cannot Create Class".to_owned(),
        }]
    );
}

#[test]
fn unexpected_failure_is_logged_without_dialog() {
    let fixture = Fixture::new();
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    project.set_dialog(DialogScript::confirm(acme));
    project.fail_next_creation(HostError::Io(io::Error::other("disk full")));

    let (outcome, logs) = capture_logs(|| fixture.invoke(&fix_for("Foo", main), main));

    assert_eq!(outcome, InvokeOutcome::Failed);
    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("failed to create class"), "{logs}");
    assert!(logs.contains("disk full"), "{logs}");

    assert_eq!(project.scheduler().pending_ui_jobs(), 0);
    assert!(project.error_dialogs().is_empty());
    assert!(project.imports().is_empty());
    assert!(project.editor_opens().is_empty());
}

#[test]
fn unknown_template_is_an_unexpected_failure() {
    let config = NovaConfig::load_from_str(
        "[create_class.templates]\nclass = \"Missing.groovy\"\n",
    )
    .unwrap()
    .create_class;
    let fixture = Fixture::with_config(config);
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    project.set_dialog(DialogScript::confirm(acme));

    let (outcome, logs) = capture_logs(|| fixture.invoke(&fix_for("Foo", main), main));

    assert_eq!(outcome, InvokeOutcome::Failed);
    assert!(logs.contains("Missing.groovy"), "{logs}");
    assert_eq!(project.file_count(), 1);
}

#[test]
fn existing_file_is_not_overwritten() {
    let fixture = Fixture::new();
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    let existing = project.add_file(acme, "Foo.groovy", FileKind::Source, "// keep me\n");
    project.set_dialog(DialogScript::confirm(acme));

    let (outcome, logs) = capture_logs(|| fixture.invoke(&fix_for("Foo", main), main));

    assert_eq!(outcome, InvokeOutcome::Failed);
    assert!(logs.contains("already exists"), "{logs}");
    assert_eq!(project.text(existing).unwrap(), "// keep me\n");
}

#[test]
fn dialog_is_never_shown_inside_a_write_action() {
    let fixture = Fixture::new();
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    project.set_dialog(DialogScript::confirm(acme));

    let fix = fix_for("Foo", main);
    let file = project.source_file(main);
    let ctx = InvocationContext::new(&fixture.host, &file);
    let (outcome, logs) =
        capture_logs(|| fixture.host.scheduler.run_write_action(|| fix.invoke(&ctx)));

    assert_eq!(outcome, InvokeOutcome::NotApplicable);
    assert!(logs.contains("inside a write action"), "{logs}");
    assert!(project.dialog_requests().is_empty());
    assert!(project.affinity_violations().is_empty());
    assert_eq!(project.file_count(), 1);
}

#[test]
fn failed_import_keeps_the_created_class() {
    let fixture = Fixture::new();
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let util = project.add_directory("com.acme.util");
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    project.set_dialog(DialogScript::confirm(util));
    project.fail_next_import(HostError::IncorrectOperation("file is read-only".to_owned()));

    let (outcome, logs) = capture_logs(|| fixture.invoke(&fix_for("Foo", main), main));

    let InvokeOutcome::Created(report) = outcome else {
        panic!("expected the class to be created, got {outcome:?}");
    };
    assert_eq!(report.import_added, None);
    assert!(matches!(report.navigation, Navigation::Opened { .. }));
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("failed to import created class"), "{logs}");
    assert!(logs.contains("file is read-only"), "{logs}");

    assert!(project.find_file(util, "Foo.groovy").is_some());
    assert_eq!(project.text(main).unwrap(), MAIN);
    assert!(project.imports().is_empty());
}

#[test]
fn failed_navigation_keeps_the_created_class() {
    let fixture = Fixture::new();
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let util = project.add_directory("com.acme.util");
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    project.set_dialog(DialogScript::confirm(util));
    project.fail_next_open(HostError::Io(io::Error::other("editor closed")));

    let (outcome, logs) = capture_logs(|| fixture.invoke(&fix_for("Foo", main), main));

    let InvokeOutcome::Created(report) = outcome else {
        panic!("expected the class to be created, got {outcome:?}");
    };
    assert_eq!(report.navigation, Navigation::Failed);
    assert_eq!(
        report.import_added.map(|fqn| fqn.to_string()),
        Some("com.acme.util.Foo".to_owned())
    );
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("failed to open created class"), "{logs}");
    assert!(logs.contains("editor closed"), "{logs}");

    assert!(project.find_file(util, "Foo.groovy").is_some());
    assert!(project.editor_opens().is_empty());
    assert!(project.affinity_violations().is_empty());
}

#[test]
fn class_missing_after_edits_keeps_original_declaration() {
    let fixture = Fixture::new();
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let util = project.add_directory("com.acme.util");
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    // The package-private default class needs a visibility edit from `com.acme`.
    project.rewrite_after_next_edit("package com.acme.util\n\nclass Renamed {\n}\n");
    project.set_dialog(DialogScript::confirm(util));

    let (outcome, logs) = capture_logs(|| fixture.invoke(&fix_for("Foo", main), main));

    let InvokeOutcome::Created(report) = outcome else {
        panic!("expected the class to be created, got {outcome:?}");
    };
    assert_eq!(report.class.name, "Foo");
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("created class not found after edits"), "{logs}");
}
