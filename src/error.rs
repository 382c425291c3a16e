//! Error types for schema analysis and deserialization.

use crate::schema::Dimension;
use std::fmt;
use thiserror::Error;

/// Location of a value inside a document, rendered as `$.rows[2].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Segment>);

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Path {
    /// The document root (`$`).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    // Errors are built at the failing value and gain context on the way out,
    // so segments are always added at the front.
    fn prepend(&mut self, segment: Segment) {
        self.0.insert(0, segment);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.0 {
            match segment {
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A field's directives do not resolve to a valid extraction shape.
///
/// Raised while building an extraction plan. The whole type is rejected;
/// there is never a partially built plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// `ArrayShape` on a field whose declared type is not a sequence.
    #[error("{type_name}.{field}: ArrayShape needs an array field, declared type is {declared}")]
    NotASequence {
        type_name: &'static str,
        field: &'static str,
        declared: &'static str,
    },

    /// `ArrayShape` dimension differs from the declared container's.
    #[error(
        "{type_name}.{field}: ArrayShape of dimension {directive} on {declared} (dimension {expected})"
    )]
    DimensionMismatch {
        type_name: &'static str,
        field: &'static str,
        directive: Dimension,
        expected: Dimension,
        declared: &'static str,
    },

    /// The element kind maps to neither a built-in conversion nor a nested type.
    #[error("{type_name}.{field}: element kind {kind} cannot convert into {declared}")]
    UnmappedElementKind {
        type_name: &'static str,
        field: &'static str,
        kind: crate::schema::ElementKind,
        declared: &'static str,
    },

    /// `DictionaryShape` on a field that is not a string-keyed map.
    #[error("{type_name}.{field}: DictionaryShape needs a map field, declared type is {declared}")]
    NotAMap {
        type_name: &'static str,
        field: &'static str,
        declared: &'static str,
    },

    /// Dynamic dictionaries hold raw values, typed ones hold nested types.
    #[error("{type_name}.{field}: {mode} dictionary cannot hold the values of {declared}")]
    DictionaryValue {
        type_name: &'static str,
        field: &'static str,
        mode: &'static str,
        declared: &'static str,
    },

    /// More than one `ArrayShape`/`DictionaryShape` directive on a field.
    #[error("{type_name}.{field}: more than one shape directive")]
    ConflictingShapes {
        type_name: &'static str,
        field: &'static str,
    },

    /// A container field without a directive saying how to fill it.
    #[error("{type_name}.{field}: {declared} needs an ArrayShape or DictionaryShape directive")]
    MissingShape {
        type_name: &'static str,
        field: &'static str,
        declared: &'static str,
    },

    #[error("{type_name}: field `{field}` is declared more than once")]
    DuplicateField {
        type_name: &'static str,
        field: &'static str,
    },
}

impl SchemaError {
    /// The declared type whose plan was rejected.
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaError::NotASequence { type_name, .. }
            | SchemaError::DimensionMismatch { type_name, .. }
            | SchemaError::UnmappedElementKind { type_name, .. }
            | SchemaError::NotAMap { type_name, .. }
            | SchemaError::DictionaryValue { type_name, .. }
            | SchemaError::ConflictingShapes { type_name, .. }
            | SchemaError::MissingShape { type_name, .. }
            | SchemaError::DuplicateField { type_name, .. } => type_name,
        }
    }

    /// The offending field, by declared name.
    pub fn field(&self) -> &'static str {
        match self {
            SchemaError::NotASequence { field, .. }
            | SchemaError::DimensionMismatch { field, .. }
            | SchemaError::UnmappedElementKind { field, .. }
            | SchemaError::NotAMap { field, .. }
            | SchemaError::DictionaryValue { field, .. }
            | SchemaError::ConflictingShapes { field, .. }
            | SchemaError::MissingShape { field, .. }
            | SchemaError::DuplicateField { field, .. } => field,
        }
    }
}

/// Result type alias for deserialization.
pub type Result<T, E = DeserializeError> = std::result::Result<T, E>;

/// Errors raised while deserializing a document.
#[derive(Debug, Error)]
pub enum DeserializeError {
    /// A scalar coercion failed: the value's kind does not match the requested primitive.
    #[error("cannot convert {found} to {expected} at {path}")]
    Conversion {
        path: Path,
        expected: &'static str,
        found: String,
    },

    /// An array/object operation met a value of another kind.
    #[error("expected {expected} at {path}, found {found}")]
    ShapeMismatch {
        path: Path,
        expected: &'static str,
        found: &'static str,
    },

    #[error("document nesting exceeds the configured max depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl DeserializeError {
    /// Create a conversion error for `found`.
    pub fn conversion(expected: &'static str, found: &serde_json::Value) -> Self {
        DeserializeError::Conversion {
            path: Path::root(),
            expected,
            found: crate::document::describe(found),
        }
    }

    /// Create a shape mismatch error for `found`.
    pub fn shape_mismatch(expected: &'static str, found: &serde_json::Value) -> Self {
        Self::shape_mismatch_kind(expected, crate::document::kind_name(found))
    }

    pub(crate) fn shape_mismatch_kind(expected: &'static str, found: &'static str) -> Self {
        DeserializeError::ShapeMismatch {
            path: Path::root(),
            expected,
            found,
        }
    }

    /// Record that the error happened under object key `key`.
    pub fn in_key(self, key: &str) -> Self {
        self.with_segment(Segment::Key(key.to_owned()))
    }

    /// Record that the error happened at array position `index`.
    pub fn at_index(self, index: usize) -> Self {
        self.with_segment(Segment::Index(index))
    }

    fn with_segment(mut self, segment: Segment) -> Self {
        match &mut self {
            DeserializeError::Conversion { path, .. }
            | DeserializeError::ShapeMismatch { path, .. } => path.prepend(segment),
            _ => {}
        }
        self
    }

    /// Where in the document the error happened, when it is tied to a value.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DeserializeError::Conversion { path, .. }
            | DeserializeError::ShapeMismatch { path, .. } => Some(path),
            _ => None,
        }
    }
}
