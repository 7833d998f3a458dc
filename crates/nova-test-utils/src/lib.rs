//! Utilities shared by Nova tests.
//!
//! [`MemoryProject`] is an in-memory host implementing every collaborator
//! trait of `nova-ide`, recording what quick fixes asked of it. The rest are
//! small helpers for LSP fixtures and log assertions.

mod logs;
mod lsp_text;
mod memory;

pub use logs::capture_logs;
pub use lsp_text::{offset_to_position, range_of};
pub use memory::{
    DialogScript, EditorOpen, ErrorDialog, FileKind, MemoryProject, MemorySourceFile,
    DEFAULT_TEMPLATES,
};
