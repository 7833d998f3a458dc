use nova_config::{CreateClassConfig, VisibilityPolicy};
use nova_core::Visibility;
use nova_ide::InvokeOutcome;
use nova_test_utils::{DialogScript, FileKind};
use pretty_assertions::assert_eq;

use super::{fix_for, Fixture, MAIN};

const PRIVATE_CLASS: &str = "package ${PACKAGE_NAME}\n\nprivate class ${NAME} {\n}\n";

fn minimal() -> CreateClassConfig {
    CreateClassConfig {
        visibility: VisibilityPolicy::Minimal,
        ..CreateClassConfig::default()
    }
}

/// Creates `Foo` from `template` in `target_package`, referenced from `com.acme`.
fn create_foo(
    config: CreateClassConfig,
    template: &str,
    target_package: &str,
) -> (Option<Visibility>, String) {
    let fixture = Fixture::with_config(config);
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let target = if target_package == "com.acme" {
        acme
    } else {
        project.add_directory(target_package)
    };
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    project.set_template("GroovyClass.groovy", template);
    project.set_dialog(DialogScript::confirm(target));

    let InvokeOutcome::Created(report) = fixture.invoke(&fix_for("Foo", main), main) else {
        panic!("expected the class to be created");
    };
    let foo = project.find_file(target, "Foo.groovy").unwrap();
    (report.visibility_changed, project.text(foo).unwrap())
}

#[test]
fn inaccessible_class_is_made_public() {
    let (changed, text) = create_foo(CreateClassConfig::default(), PRIVATE_CLASS, "com.acme");

    assert_eq!(changed, Some(Visibility::Public));
    assert_eq!(text, "package com.acme\n\npublic class Foo {\n}\n");
}

#[test]
fn accessible_class_is_left_alone() {
    let template = "package ${PACKAGE_NAME}\n\nprotected class ${NAME} {\n}\n";
    let (changed, text) = create_foo(CreateClassConfig::default(), template, "com.acme");

    assert_eq!(changed, None);
    assert_eq!(text, "package com.acme\n\nprotected class Foo {\n}\n");
}

#[test]
fn minimal_policy_stops_at_package_private_within_the_package() {
    let (changed, text) = create_foo(minimal(), PRIVATE_CLASS, "com.acme");

    assert_eq!(changed, Some(Visibility::PackagePrivate));
    assert_eq!(text, "package com.acme\n\nclass Foo {\n}\n");
}

#[test]
fn minimal_policy_goes_public_across_packages() {
    let (changed, text) = create_foo(minimal(), PRIVATE_CLASS, "com.acme.util");

    assert_eq!(changed, Some(Visibility::Public));
    assert_eq!(text, "package com.acme.util\n\npublic class Foo {\n}\n");
}

#[test]
fn annotations_stay_in_front_of_the_new_modifier() {
    let template = "package ${PACKAGE_NAME}\n\n@groovy.transform.Canonical\nclass ${NAME} {\n}\n";
    let (changed, text) = create_foo(CreateClassConfig::default(), template, "com.acme.util");

    assert_eq!(changed, Some(Visibility::Public));
    assert_eq!(
        text,
        "package com.acme.util\n\n@groovy.transform.Canonical\npublic class Foo {\n}\n"
    );
}

#[test]
fn public_class_is_never_widened_again() {
    let fixture = Fixture::new();
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let internal = project.add_directory("com.acme.internal");
    project.seal_package("com.acme.internal");
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    project.set_template(
        "GroovyClass.groovy",
        "package ${PACKAGE_NAME}\n\npublic class ${NAME} {\n}\n",
    );
    project.set_dialog(DialogScript::confirm(internal));

    let InvokeOutcome::Created(report) = fixture.invoke(&fix_for("Foo", main), main) else {
        panic!("expected the class to be created");
    };

    assert_eq!(report.visibility_changed, None);
    let foo = project.find_file(internal, "Foo.groovy").unwrap();
    assert_eq!(
        project.text(foo).unwrap(),
        "package com.acme.internal\n\npublic class Foo {\n}\n"
    );
}

#[test]
fn sealed_package_still_hides_widened_class_under_minimal_policy() {
    let fixture = Fixture::with_config(minimal());
    let project = &fixture.project;
    let acme = project.add_directory("com.acme");
    let internal = project.add_directory("com.acme.internal");
    project.seal_package("com.acme.internal");
    let main = project.add_file(acme, "Main.groovy", FileKind::Source, MAIN);
    project.set_template("GroovyClass.groovy", PRIVATE_CLASS);
    project.set_dialog(DialogScript::confirm(internal));

    let InvokeOutcome::Created(report) = fixture.invoke(&fix_for("Foo", main), main) else {
        panic!("expected the class to be created");
    };

    // No level makes it reachable; the fallback is `public`.
    assert_eq!(report.visibility_changed, Some(Visibility::Public));
}
