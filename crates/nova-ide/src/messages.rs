//! User-visible strings of the create-class quick fix.
//!
//! Keys mirror the message bundle identifiers used by IDE front ends.

pub const CREATE_CLASS_TEXT: &str = "create.class.text";
pub const CREATE_CLASS_FAMILY_NAME: &str = "create.class.family.name";
pub const NO_CLASS_IN_FILE_TEMPLATE: &str = "no.class.in.file.template";
pub const CANNOT_CREATE_CLASS_ERROR_TEXT: &str = "cannot.create.class.error.text";
pub const CANNOT_CREATE_CLASS_ERROR_TITLE: &str = "cannot.create.class.error.title";

fn pattern(key: &str) -> Option<&'static str> {
    let pattern = match key {
        CREATE_CLASS_TEXT => "Create class '{0}'",
        CREATE_CLASS_FAMILY_NAME => "Create Class",
        NO_CLASS_IN_FILE_TEMPLATE => "No class found in file template",
        CANNOT_CREATE_CLASS_ERROR_TEXT => "Cannot create class '{0}': {1}",
        CANNOT_CREATE_CLASS_ERROR_TITLE => "Cannot Create Class",
        _ => return None,
    };
    Some(pattern)
}

/// Looks up a message by key, substituting `{0}`, `{1}`, ... with `args`.
pub fn message(key: &str, args: &[&str]) -> Option<String> {
    let mut out = pattern(key)?.to_owned();
    for (idx, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{idx}}}"), arg);
    }
    Some(out)
}

// An unknown key renders as itself.
fn text(key: &'static str) -> &'static str {
    pattern(key).unwrap_or(key)
}

fn render(key: &'static str, args: &[&str]) -> String {
    message(key, args).unwrap_or_else(|| key.to_owned())
}

pub fn create_class_text(name: &str) -> String {
    render(CREATE_CLASS_TEXT, &[name])
}

pub fn create_class_family_name() -> &'static str {
    text(CREATE_CLASS_FAMILY_NAME)
}

pub fn no_class_in_file_template() -> &'static str {
    text(NO_CLASS_IN_FILE_TEMPLATE)
}

pub fn cannot_create_class_error_text(name: &str, cause: &str) -> String {
    render(CANNOT_CREATE_CLASS_ERROR_TEXT, &[name, cause])
}

pub fn cannot_create_class_error_title() -> &'static str {
    text(CANNOT_CREATE_CLASS_ERROR_TITLE)
}
