use nova_config::{ConfigValidationError, NovaConfig};
use pretty_assertions::assert_eq;

#[test]
fn reports_unknown_keys_with_full_paths() {
    let text = r#"
typo = 1

[create_class]
file_extnesion = "java"

[create_class.templates]
klass = "X.groovy"
"#;

    let (_config, diagnostics) =
        NovaConfig::load_from_str_with_diagnostics(text).expect("config should parse");

    assert_eq!(
        diagnostics.unknown_keys,
        vec![
            "create_class.file_extnesion",
            "create_class.templates.klass",
            "typo"
        ]
    );
    assert!(diagnostics.errors.is_empty());
}

#[test]
fn reports_empty_extension_and_template() {
    let text = r#"
[create_class]
file_extension = "."

[create_class.templates]
enum = "  "
"#;

    let (_config, diagnostics) =
        NovaConfig::load_from_str_with_diagnostics(text).expect("config should parse");

    let paths: Vec<_> = diagnostics
        .errors
        .iter()
        .map(|err| match err {
            ConfigValidationError::InvalidValue { toml_path, .. } => toml_path.as_str(),
            _ => "other",
        })
        .collect();
    assert_eq!(
        paths,
        vec!["create_class.file_extension", "create_class.templates.enum"]
    );
}

#[test]
fn clean_config_has_no_diagnostics() {
    let (_config, diagnostics) =
        NovaConfig::load_from_str_with_diagnostics("[logging]\nlevel = \"warn\"\n")
            .expect("config should parse");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}
