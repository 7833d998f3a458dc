//! Core shared types for Nova.
//!
//! This crate is intentionally small: ids, text offsets, package/qualified
//! names, and plain text edits. Everything here is host-agnostic.

pub mod edit;
mod id;
pub mod name;
mod panic;
mod symbol;
pub mod text;

pub use edit::{EditError, TextEdit};
pub use id::{DirectoryId, FileId, ModuleId};
pub use name::{is_ident_continue, is_ident_start, is_valid_identifier, PackageName, QualifiedName};
pub use panic::panic_payload_to_str;
pub use symbol::{ClassKind, Visibility};
pub use text::{LineIndex, Position, Range, TextRange, TextSize};
