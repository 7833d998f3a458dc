use lsp_types::{Position, Range};
use nova_core::{LineIndex, TextSize};

/// Converts a UTF-8 byte offset into an LSP position.
#[must_use]
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let index = LineIndex::new(text);
    index
        .position(text, TextSize::from(offset.min(text.len()) as u32))
        .into()
}

/// LSP range of the first occurrence of `needle` in `text`.
#[must_use]
pub fn range_of(text: &str, needle: &str) -> Range {
    let start = text
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in fixture"));
    Range::new(
        offset_to_position(text, start),
        offset_to_position(text, start + needle.len()),
    )
}
