use nova_core::{QualifiedName, TextEdit, TextRange, TextSize, Visibility};

use crate::decl::ClassDeclaration;

/// Edit that gives `decl` the requested visibility.
///
/// Returns `None` when the declaration already has it.
pub fn set_visibility_edit(
    text: &str,
    decl: &ClassDeclaration,
    visibility: Visibility,
) -> Option<TextEdit> {
    if decl.visibility == visibility {
        return None;
    }

    match (decl.visibility_range, visibility.keyword()) {
        (Some(range), Some(keyword)) => Some(TextEdit::replace(range, keyword)),
        (Some(range), None) => {
            // Drop the keyword together with the whitespace that followed it.
            let end = u32::from(range.end()) as usize;
            let ws = text[end..]
                .chars()
                .take_while(|ch| ch.is_whitespace())
                .map(char::len_utf8)
                .sum::<usize>();
            let end = TextSize::from((end + ws) as u32);
            Some(TextEdit::replace(TextRange::new(range.start(), end), ""))
        }
        (None, Some(keyword)) => Some(TextEdit::insert(
            decl.modifier_insert_offset,
            format!("{keyword} "),
        )),
        (None, None) => None,
    }
}

/// Edit inserting a public no-argument constructor at the top of the class body.
///
/// Returns `None` for declarations without a body.
pub fn default_constructor_edit(text: &str, decl: &ClassDeclaration) -> Option<TextEdit> {
    let body = decl.body_range?;
    let open = u32::from(body.start()) as usize;
    let after_brace = open + 1;

    let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let indent = body_indent(text, decl);
    let name = &decl.name;
    let constructor =
        format!("{indent}public {name}() {{{line_ending}{indent}}}{line_ending}");

    let rest = text.get(after_brace..)?;
    if rest.starts_with(line_ending) {
        let offset = TextSize::from((after_brace + line_ending.len()) as u32);
        Some(TextEdit::insert(offset, constructor))
    } else {
        let offset = TextSize::from(after_brace as u32);
        Some(TextEdit::insert(offset, format!("{line_ending}{constructor}")))
    }
}

fn body_indent(text: &str, decl: &ClassDeclaration) -> String {
    let start = u32::from(decl.range.start()) as usize;
    let line_start = text[..start].rfind('\n').map_or(0, |idx| idx + 1);
    let base: String = text[line_start..start]
        .chars()
        .take_while(|ch| *ch == ' ' || *ch == '\t')
        .collect();
    format!("{base}    ")
}

/// Edit adding `import <fqn>;` to a compilation unit.
///
/// The import goes after the last existing import, else after the package
/// declaration (separated by a blank line), else at the top of the file.
/// Returns `None` when the file already imports `fqn` exactly or through a
/// wildcard on its package.
pub fn import_edit(text: &str, fqn: &QualifiedName) -> Option<TextEdit> {
    let path = fqn.as_str();
    let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };

    let mut package_end: Option<usize> = None;
    let mut last_import_end: Option<usize> = None;

    let mut offset = 0usize;
    for segment in text.split_inclusive('\n') {
        let line_end = offset + segment.len();
        let line = segment.trim_end_matches(['\n', '\r']);

        if package_end.is_none() && is_package_declaration(line) {
            package_end = Some(line_end);
        }

        if let Some(imported) = parse_import_path(line) {
            if imported == path || wildcard_import_covers(imported, path) {
                return None;
            }
            last_import_end = Some(line_end);
        }

        offset = line_end;
    }

    let (insert_at, blank_line) = match (last_import_end, package_end) {
        (Some(end), _) => (end, false),
        (None, Some(end)) => (skip_blank_line(text, end).unwrap_or(end), true),
        (None, None) => (0, false),
    };

    let mut new_text = String::new();
    if insert_at > 0 && !text[..insert_at].ends_with('\n') {
        new_text.push_str(line_ending);
    }
    let after_blank_line = text[..insert_at].ends_with(&format!("{line_ending}{line_ending}"));
    if blank_line && !after_blank_line {
        new_text.push_str(line_ending);
    }
    new_text.push_str("import ");
    new_text.push_str(path);
    new_text.push(';');
    new_text.push_str(line_ending);
    if insert_at == 0 && !text.is_empty() {
        new_text.push_str(line_ending);
    }

    Some(TextEdit::insert(TextSize::from(insert_at as u32), new_text))
}

fn is_package_declaration(line: &str) -> bool {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix("package") {
        Some(rest) => rest.starts_with(char::is_whitespace),
        None => false,
    }
}

/// Path of an `import` line (`import a.b.C;`, `import a.b.*`); static imports
/// are ignored.
fn parse_import_path(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("import")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    if rest
        .strip_prefix("static")
        .is_some_and(|after| after.starts_with(char::is_whitespace))
    {
        return None;
    }
    let end = rest.find(';').unwrap_or(rest.len());
    let path = rest[..end].trim();
    // Groovy aliases: `import a.B as C`
    let path = path.split_whitespace().next().unwrap_or(path);
    (!path.is_empty()).then_some(path)
}

fn wildcard_import_covers(imported: &str, path: &str) -> bool {
    let Some(prefix) = imported.strip_suffix(".*") else {
        return false;
    };
    let Some(rest) = path.strip_prefix(prefix) else {
        return false;
    };
    let Some(rest) = rest.strip_prefix('.') else {
        return false;
    };
    // `import foo.*;` brings in types of package `foo`, not of its subpackages.
    !rest.contains('.')
}

/// If the line starting at `offset` is blank, returns the offset of the next line.
fn skip_blank_line(text: &str, offset: usize) -> Option<usize> {
    let rest = text.get(offset..)?;
    let line_len = rest.find('\n')?;
    rest[..line_len]
        .trim()
        .is_empty()
        .then_some(offset + line_len + 1)
}
