//! Lightweight source scanning for class-like declarations.
//!
//! This is not a parser: it tokenizes enough of a Java/Groovy compilation unit
//! to find the package declaration, imports, and top-level class-like
//! declarations, and to compute the text edits quick fixes need (visibility
//! changes, constructors, imports).

mod decl;
mod edits;
mod lexer;

pub use decl::{class_declarations, package_declaration, ClassDeclaration, PackageDeclaration};
pub use edits::{default_constructor_edit, import_edit, set_visibility_edit};
pub use lexer::{lex, Token, TokenKind};
