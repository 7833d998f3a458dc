use nova_core::name::{is_ident_continue, is_ident_start};
use nova_core::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Semicolon,
    Dot,
    At,
    Literal,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range]
    }
}

/// Tokenize `text`, dropping whitespace and comments.
///
/// String and character literals (including `"""` text blocks) become a single
/// [`TokenKind::Literal`] token; unterminated literals and comments run to EOF.
pub fn lex(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let start = i;
        let b = bytes[i];

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            i = memchr_or_end(bytes, i, b'\n');
            continue;
        }

        if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i = match text[i + 2..].find("*/") {
                Some(rel) => i + 2 + rel + 2,
                None => bytes.len(),
            };
            continue;
        }

        let kind = match b {
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b';' => TokenKind::Semicolon,
            b'.' => TokenKind::Dot,
            b'@' => TokenKind::At,
            b'"' | b'\'' => {
                i = skip_literal(text, i);
                tokens.push(token(TokenKind::Literal, start, i));
                continue;
            }
            _ => {
                let ch = text[i..].chars().next().unwrap_or('\0');
                if is_ident_start(ch) {
                    i += ch.len_utf8();
                    while let Some(next) = text[i..].chars().next() {
                        if !is_ident_continue(next) {
                            break;
                        }
                        i += next.len_utf8();
                    }
                    tokens.push(token(TokenKind::Ident, start, i));
                    continue;
                }
                i += ch.len_utf8().max(1);
                tokens.push(token(TokenKind::Other, start, i));
                continue;
            }
        };

        i += 1;
        tokens.push(token(kind, start, i));
    }

    tokens
}

fn token(kind: TokenKind, start: usize, end: usize) -> Token {
    Token {
        kind,
        range: TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32)),
    }
}

fn memchr_or_end(bytes: &[u8], from: usize, needle: u8) -> usize {
    bytes[from..]
        .iter()
        .position(|b| *b == needle)
        .map_or(bytes.len(), |rel| from + rel)
}

fn skip_literal(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let quote = bytes[start];

    let triple = if quote == b'"' { "\"\"\"" } else { "'''" };
    if text[start..].starts_with(triple) {
        return match text[start + 3..].find(triple) {
            Some(rel) => start + 3 + rel + 3,
            None => bytes.len(),
        };
    }

    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
