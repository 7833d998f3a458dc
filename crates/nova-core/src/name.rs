//! Package and qualified names.
//!
//! Names are dotted identifiers (`com.acme.util`). The empty package is the
//! default package: classes declared there have an unqualified FQN and can
//! never be imported.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

pub fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_ident::is_xid_start(ch)
}

pub fn is_ident_continue(ch: char) -> bool {
    ch == '$' || ch == '_' || unicode_ident::is_xid_continue(ch)
}

/// Returns `true` if `name` is a single identifier (`Foo`, `_bar`, `$x1`).
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_ident_start(first) && chars.all(is_ident_continue)
}

/// A (possibly empty) dotted package name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(SmolStr);

impl PackageName {
    /// The default (unnamed) package.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a package name from dotted text. Surrounding whitespace is ignored.
    ///
    /// Returns `None` if any segment is not an identifier.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Some(Self::root());
        }
        if !text.split('.').all(is_valid_identifier) {
            return None;
        }
        Some(Self(SmolStr::new(text)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|segment| !segment.is_empty())
    }

    /// Qualify `simple_name` with this package.
    pub fn qualify(&self, simple_name: &str) -> QualifiedName {
        if self.is_root() {
            QualifiedName(SmolStr::new(simple_name))
        } else {
            QualifiedName(SmolStr::new(format!("{}.{simple_name}", self.0)))
        }
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully-qualified type name such as `com.acme.util.Foo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedName(SmolStr);

impl QualifiedName {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || !text.split('.').all(is_valid_identifier) {
            return None;
        }
        Some(Self(SmolStr::new(text)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn simple_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(dot) => &self.0[dot + 1..],
            None => &self.0,
        }
    }

    /// The package component, or `None` for classes in the default package.
    pub fn package(&self) -> Option<PackageName> {
        let dot = self.0.rfind('.')?;
        Some(PackageName(SmolStr::new(&self.0[..dot])))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
