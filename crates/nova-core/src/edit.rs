//! Single-range text replacements.

use crate::{TextRange, TextSize};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("edit range {range:?} is out of bounds for text length {text_len:?}")]
    RangeOutOfBounds { range: TextRange, text_len: TextSize },
    #[error("offset {offset:?} is not a UTF-8 character boundary")]
    InvalidUtf8Boundary { offset: TextSize },
}

impl TextEdit {
    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::replace(TextRange::empty(offset), text)
    }

    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            replacement: text.into(),
        }
    }

    /// Returns `text` with this edit applied.
    pub fn apply(&self, text: &str) -> Result<String, EditError> {
        let text_len = TextSize::of(text);
        if self.range.end() > text_len {
            return Err(EditError::RangeOutOfBounds {
                range: self.range,
                text_len,
            });
        }
        for offset in [self.range.start(), self.range.end()] {
            if !text.is_char_boundary(usize::from(offset)) {
                return Err(EditError::InvalidUtf8Boundary { offset });
            }
        }

        let mut out = String::with_capacity(text.len() + self.replacement.len());
        out.push_str(&text[..usize::from(self.range.start())]);
        out.push_str(&self.replacement);
        out.push_str(&text[usize::from(self.range.end())..]);
        Ok(out)
    }
}
