//! Directive vocabulary attached to declared fields.
//!
//! The set of directives is closed. A field carries zero or more of them and
//! the analyzer resolves them in a fixed order regardless of how they were
//! listed:
//!
//! 1. `Ignore` removes the field; nothing else on it is looked at.
//! 2. Renames: positional names apply first, `json_name` options after them.
//! 3. `DictionaryShape` / `ArrayShape` claim the field's shape (at most one).
//! 4. Otherwise a nested deserializable type is extracted as `Nested`, and
//!    anything else as a scalar.

use serde::Serialize;
use std::fmt;

/// Element kinds an `ArrayShape` directive can name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    #[default]
    Int,
    Boolean,
    Float,
    Double,
    Char,
    String,
    /// The element is itself a nested deserializable type.
    Other,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Array rank. Only one- and two-dimensional arrays exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Dimension {
    #[default]
    One,
    Two,
}

impl Dimension {
    pub fn rank(self) -> u8 {
        match self {
            Dimension::One => 1,
            Dimension::Two => 2,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rank())
    }
}

/// Arguments of a rename directive.
///
/// Mirrors an attribute that takes the name positionally and/or through a
/// named `json_name` option. When both are given, `json_name` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameArgs {
    pub positional: Option<String>,
    pub json_name: Option<String>,
}

impl RenameArgs {
    pub fn new(name: impl Into<String>) -> Self {
        RenameArgs {
            positional: Some(name.into()),
            json_name: None,
        }
    }

    pub fn json_name(mut self, name: impl Into<String>) -> Self {
        self.json_name = Some(name.into());
        self
    }
}

/// Arguments of an array directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayArgs {
    pub positional: Option<ElementKind>,
    /// Named `kind` option; overrides the positional kind.
    pub kind: Option<ElementKind>,
    pub dimension: Dimension,
}

impl ArrayArgs {
    pub fn new(dimension: Dimension) -> Self {
        ArrayArgs {
            positional: None,
            kind: None,
            dimension,
        }
    }

    pub fn positional(mut self, kind: ElementKind) -> Self {
        self.positional = Some(kind);
        self
    }

    pub fn kind(mut self, kind: ElementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Named option, else positional argument, else `Int`.
    pub fn resolved_kind(&self) -> ElementKind {
        self.kind.or(self.positional).unwrap_or_default()
    }
}

/// Arguments of a dictionary directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DictionaryArgs {
    /// Keep raw document values instead of deserializing a nested type.
    pub dynamic: bool,
}

/// A per-field instruction controlling name, inclusion and shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Rename(RenameArgs),
    Ignore,
    ArrayShape(ArrayArgs),
    DictionaryShape(DictionaryArgs),
}

impl Directive {
    /// Positional rename.
    pub fn rename(name: impl Into<String>) -> Self {
        Directive::Rename(RenameArgs::new(name))
    }

    /// Rename through the named `json_name` option.
    pub fn json_name(name: impl Into<String>) -> Self {
        Directive::Rename(RenameArgs::default().json_name(name))
    }

    pub fn array(kind: ElementKind) -> Self {
        Directive::ArrayShape(ArrayArgs::new(Dimension::One).positional(kind))
    }

    pub fn array_2d(kind: ElementKind) -> Self {
        Directive::ArrayShape(ArrayArgs::new(Dimension::Two).positional(kind))
    }

    /// Typed dictionary: every value is a nested deserializable type.
    pub fn dictionary() -> Self {
        Directive::DictionaryShape(DictionaryArgs::default())
    }

    /// Dynamic dictionary: values are kept as raw document values.
    pub fn dynamic_dictionary() -> Self {
        Directive::DictionaryShape(DictionaryArgs { dynamic: true })
    }

    /// Whether this directive decides the field's shape.
    pub fn claims_shape(&self) -> bool {
        matches!(self, Directive::ArrayShape(_) | Directive::DictionaryShape(_))
    }
}
