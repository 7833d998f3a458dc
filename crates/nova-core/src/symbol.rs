use std::fmt;

use serde::{Deserialize, Serialize};

/// The flavour of a class-like declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

impl ClassKind {
    /// Source keyword introducing a declaration of this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "@interface",
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Access level of a declaration, ordered from least to most permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    PackagePrivate,
    Protected,
    Public,
}

impl Visibility {
    /// The modifier keyword, or `None` for package-private (no modifier).
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Visibility::Private => Some("private"),
            Visibility::PackagePrivate => None,
            Visibility::Protected => Some("protected"),
            Visibility::Public => Some("public"),
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "private" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            "public" => Some(Visibility::Public),
            _ => None,
        }
    }

    /// Strictly wider levels, narrowest first.
    pub fn wider(self) -> impl Iterator<Item = Visibility> {
        [
            Visibility::PackagePrivate,
            Visibility::Protected,
            Visibility::Public,
        ]
        .into_iter()
        .filter(move |candidate| *candidate > self)
    }
}
