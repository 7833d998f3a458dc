use nova_core::{ClassKind, PackageName, TextRange, TextSize, Visibility};

use crate::lexer::{lex, Token, TokenKind};

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "abstract",
    "final",
    "static",
    "sealed",
    "strictfp",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDeclaration {
    pub name: PackageName,
    pub range: TextRange,
}

/// A top-level class-like declaration found in a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    pub name: String,
    pub kind: ClassKind,
    pub visibility: Visibility,
    /// Range of the explicit visibility keyword, if any.
    pub visibility_range: Option<TextRange>,
    /// Where a visibility keyword goes when none is present: the first
    /// keyword modifier, or the declaration keyword itself.
    pub modifier_insert_offset: TextSize,
    /// Whole declaration, annotations and modifiers included.
    pub range: TextRange,
    pub name_range: TextRange,
    /// Range of the `{ ... }` body, braces included.
    pub body_range: Option<TextRange>,
}

/// Finds the `package` declaration of a compilation unit.
///
/// Package annotations are skipped. The trailing `;` is optional (Groovy).
pub fn package_declaration(text: &str) -> Option<PackageDeclaration> {
    let tokens = lex(text);
    let mut idx = 0;

    while idx < tokens.len() {
        let token = tokens[idx];
        match token.kind {
            TokenKind::At => idx = skip_annotation(text, &tokens, idx),
            TokenKind::Ident if token.text(text) == "package" => {
                let (name, end) = dotted_name(text, &tokens, idx + 1)?;
                let mut range_end = tokens[end - 1].range.end();
                if tokens.get(end).map(|t| t.kind) == Some(TokenKind::Semicolon) {
                    range_end = tokens[end].range.end();
                }
                return Some(PackageDeclaration {
                    name: PackageName::parse(&name)?,
                    range: TextRange::new(token.range.start(), range_end),
                });
            }
            _ => return None,
        }
    }

    None
}

/// Lists the top-level class-like declarations of a compilation unit, in source order.
pub fn class_declarations(text: &str) -> Vec<ClassDeclaration> {
    let tokens = lex(text);
    let mut out = Vec::new();

    let mut decl_start: Option<TextSize> = None;
    let mut first_modifier: Option<TextSize> = None;
    let mut visibility: Option<(Visibility, TextRange)> = None;
    let mut idx = 0;

    while idx < tokens.len() {
        let token = tokens[idx];
        let word = token.text(text);

        match token.kind {
            TokenKind::Ident if word == "package" || word == "import" => {
                idx = skip_statement(text, &tokens, idx);
                decl_start = None;
                first_modifier = None;
                visibility = None;
                continue;
            }
            TokenKind::At
                if tokens.get(idx + 1).map(|t| t.text(text)) == Some("interface") =>
            {
                if let Some(decl) = finish_declaration(
                    text,
                    &tokens,
                    idx,
                    idx + 2,
                    ClassKind::Annotation,
                    decl_start,
                    first_modifier,
                    visibility,
                ) {
                    idx = decl.1;
                    out.push(decl.0);
                } else {
                    idx += 2;
                }
                decl_start = None;
                first_modifier = None;
                visibility = None;
                continue;
            }
            TokenKind::At => {
                decl_start.get_or_insert(token.range.start());
                idx = skip_annotation(text, &tokens, idx);
                continue;
            }
            TokenKind::Ident if MODIFIERS.contains(&word) => {
                decl_start.get_or_insert(token.range.start());
                first_modifier.get_or_insert(token.range.start());
                if let Some(level) = Visibility::from_keyword(word) {
                    visibility = Some((level, token.range));
                }
                idx += 1;
                continue;
            }
            TokenKind::Ident
                if matches!(word, "class" | "interface" | "enum")
                    && (idx == 0 || tokens[idx - 1].kind != TokenKind::Dot) =>
            {
                let kind = match word {
                    "interface" => ClassKind::Interface,
                    "enum" => ClassKind::Enum,
                    _ => ClassKind::Class,
                };
                if let Some(decl) = finish_declaration(
                    text,
                    &tokens,
                    idx,
                    idx + 1,
                    kind,
                    decl_start,
                    first_modifier,
                    visibility,
                ) {
                    idx = decl.1;
                    out.push(decl.0);
                } else {
                    idx += 1;
                }
            }
            TokenKind::LBrace => idx = skip_braces(&tokens, idx),
            _ => idx += 1,
        }

        decl_start = None;
        first_modifier = None;
        visibility = None;
    }

    out
}

/// Completes a declaration whose keyword starts at `keyword_idx` and whose name
/// token is expected at `name_idx`. Returns the declaration and the index of
/// the first token after its body.
#[allow(clippy::too_many_arguments)]
fn finish_declaration(
    text: &str,
    tokens: &[Token],
    keyword_idx: usize,
    name_idx: usize,
    kind: ClassKind,
    decl_start: Option<TextSize>,
    first_modifier: Option<TextSize>,
    visibility: Option<(Visibility, TextRange)>,
) -> Option<(ClassDeclaration, usize)> {
    let name_token = tokens.get(name_idx)?;
    if name_token.kind != TokenKind::Ident {
        return None;
    }

    let keyword_start = tokens[keyword_idx].range.start();
    let start = decl_start.unwrap_or(keyword_start);

    // Header (type parameters, extends/implements, record components) runs to the body.
    let mut idx = name_idx + 1;
    let mut depth = 0usize;
    while idx < tokens.len() {
        match tokens[idx].kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::LBrace if depth == 0 => break,
            TokenKind::Semicolon if depth == 0 => break,
            _ => {}
        }
        idx += 1;
    }

    let (body_range, next, end) = match tokens.get(idx) {
        Some(open) if open.kind == TokenKind::LBrace => {
            let after = skip_braces(tokens, idx);
            let body_end = if after < tokens.len() || is_balanced(&tokens[idx..]) {
                tokens[after - 1].range.end()
            } else {
                TextSize::from(text.len() as u32)
            };
            let body = TextRange::new(open.range.start(), body_end);
            (Some(body), after, body_end)
        }
        Some(semi) => (None, idx + 1, semi.range.end()),
        None => (None, idx, TextSize::from(text.len() as u32)),
    };

    let (visibility, visibility_range) = match visibility {
        Some((level, range)) => (level, Some(range)),
        None => (Visibility::PackagePrivate, None),
    };

    Some((
        ClassDeclaration {
            name: name_token.text(text).to_string(),
            kind,
            visibility,
            visibility_range,
            modifier_insert_offset: first_modifier.unwrap_or(keyword_start),
            range: TextRange::new(start, end),
            name_range: name_token.range,
            body_range,
        },
        next,
    ))
}

/// Skips a balanced `{ ... }` starting at `open_idx`; returns the index after
/// the matching `}` (or `tokens.len()` if unbalanced).
fn skip_braces(tokens: &[Token], open_idx: usize) -> usize {
    let mut depth = 0usize;
    let mut idx = open_idx;
    while idx < tokens.len() {
        match tokens[idx].kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return idx + 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    tokens.len()
}

fn is_balanced(tokens: &[Token]) -> bool {
    let mut depth = 0isize;
    for token in tokens {
        match token.kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => depth -= 1,
            _ => {}
        }
    }
    depth == 0
}

/// Skips `@Name`, `@a.b.Name` and `@Name(...)`.
fn skip_annotation(text: &str, tokens: &[Token], at_idx: usize) -> usize {
    let mut idx = match dotted_name(text, tokens, at_idx + 1) {
        Some((_, end)) => end,
        None => return at_idx + 1,
    };
    if tokens.get(idx).map(|t| t.kind) == Some(TokenKind::LParen) {
        let mut depth = 0usize;
        while idx < tokens.len() {
            match tokens[idx].kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return idx + 1;
                    }
                }
                _ => {}
            }
            idx += 1;
        }
    }
    idx
}

/// Skips a `package`/`import` statement. The terminating `;` is optional, in
/// which case the statement ends at the last token of the dotted path.
fn skip_statement(text: &str, tokens: &[Token], keyword_idx: usize) -> usize {
    let mut idx = keyword_idx + 1;
    if tokens.get(idx).map(|t| t.text(text)) == Some("static") {
        idx += 1;
    }
    if let Some((_, end)) = dotted_name(text, tokens, idx) {
        idx = end;
    }
    // `import foo.*`
    if tokens.get(idx).map(|t| t.kind) == Some(TokenKind::Dot)
        && tokens.get(idx + 1).map(|t| t.text(text)) == Some("*")
    {
        idx += 2;
    }
    if tokens.get(idx).map(|t| t.kind) == Some(TokenKind::Semicolon) {
        idx += 1;
    }
    idx
}

/// Reads `a.b.c` starting at `idx`; returns the text and the index after it.
fn dotted_name(text: &str, tokens: &[Token], idx: usize) -> Option<(String, usize)> {
    let first = tokens.get(idx)?;
    if first.kind != TokenKind::Ident {
        return None;
    }

    let mut name = first.text(text).to_string();
    let mut idx = idx + 1;
    while tokens.get(idx).map(|t| t.kind) == Some(TokenKind::Dot) {
        match tokens.get(idx + 1) {
            Some(next) if next.kind == TokenKind::Ident => {
                name.push('.');
                name.push_str(next.text(text));
                idx += 2;
            }
            _ => break,
        }
    }
    Some((name, idx))
}
