//! Byte offsets and their LSP (UTF-16) counterparts.

pub use text_size::{TextRange, TextSize};

/// Zero-based line and UTF-16 column, as LSP counts them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Start offsets of every line of one text snapshot.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut starts = vec![TextSize::from(0)];
        for (i, b) in bytes.iter().enumerate() {
            let ends_line = match b {
                b'\n' => true,
                b'\r' => bytes.get(i + 1) != Some(&b'\n'),
                _ => false,
            };
            if ends_line {
                starts.push(TextSize::from(i as u32 + 1));
            }
        }
        Self { starts }
    }

    /// Byte bounds of `line`, terminator excluded.
    fn line_bounds(&self, text: &str, line: usize) -> Option<(usize, usize)> {
        let start = usize::from(*self.starts.get(line)?);
        let end = match self.starts.get(line + 1) {
            Some(next) => {
                let content = &text[start..usize::from(*next)];
                start + content.trim_end_matches(['\n', '\r']).len()
            }
            None => text.len(),
        };
        Some((start, end))
    }

    /// LSP position of `offset`. Offsets inside a line terminator map to the end of the line.
    ///
    /// `text` must be the snapshot this index was built from.
    pub fn position(&self, text: &str, offset: TextSize) -> Position {
        let offset = usize::from(offset.min(TextSize::of(text)));
        let line = self
            .starts
            .partition_point(|start| usize::from(*start) <= offset)
            .saturating_sub(1);
        let (start, end) = self.line_bounds(text, line).unwrap_or((0, 0));
        let character = text[start..offset.min(end)]
            .chars()
            .map(|ch| ch.len_utf16() as u32)
            .sum();
        Position::new(line as u32, character)
    }

    /// Byte offset of `position`, or `None` when it lies past the end of its
    /// line or inside a surrogate pair.
    pub fn offset_of_position(&self, text: &str, position: Position) -> Option<TextSize> {
        let (start, end) = self.line_bounds(text, position.line as usize)?;
        let mut column = 0u32;
        for (idx, ch) in text[start..end].char_indices() {
            if column == position.character {
                return Some(TextSize::from((start + idx) as u32));
            }
            column += ch.len_utf16() as u32;
            if column > position.character {
                return None;
            }
        }
        (column == position.character).then(|| TextSize::from(end as u32))
    }

    pub fn text_range(&self, text: &str, range: Range) -> Option<TextRange> {
        let start = self.offset_of_position(text, range.start)?;
        let end = self.offset_of_position(text, range.end)?;
        (start <= end).then(|| TextRange::new(start, end))
    }
}

#[cfg(feature = "lsp")]
mod lsp_compat {
    use super::{Position, Range};

    impl From<Position> for lsp_types::Position {
        fn from(value: Position) -> Self {
            lsp_types::Position::new(value.line, value.character)
        }
    }

    impl From<lsp_types::Position> for Position {
        fn from(value: lsp_types::Position) -> Self {
            Position::new(value.line, value.character)
        }
    }

    impl From<lsp_types::Range> for Range {
        fn from(value: lsp_types::Range) -> Self {
            Range::new(value.start.into(), value.end.into())
        }
    }
}
