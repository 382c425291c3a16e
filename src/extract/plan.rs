//! Extraction plans
//!
//! A plan is the resolved, ordered set of per-field extraction instructions
//! for one declared type. It is computed once from the type's declaration and
//! never changes afterwards.

use crate::schema::{ElementKind, TypeRef};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Element conversion selected for an array shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementShape {
    Int,
    Boolean,
    Float,
    Double,
    Char,
    String,
    /// Each element is deserialized as this nested type.
    Nested(TypeRef),
}

impl ElementShape {
    /// Built-in conversion for `kind`; `None` for [`ElementKind::Other`].
    pub fn builtin(kind: ElementKind) -> Option<Self> {
        match kind {
            ElementKind::Int => Some(ElementShape::Int),
            ElementKind::Boolean => Some(ElementShape::Boolean),
            ElementKind::Float => Some(ElementShape::Float),
            ElementKind::Double => Some(ElementShape::Double),
            ElementKind::Char => Some(ElementShape::Char),
            ElementKind::String => Some(ElementShape::String),
            ElementKind::Other => None,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementShape::Int => ElementKind::Int,
            ElementShape::Boolean => ElementKind::Boolean,
            ElementShape::Float => ElementKind::Float,
            ElementShape::Double => ElementKind::Double,
            ElementShape::Char => ElementKind::Char,
            ElementShape::String => ElementKind::String,
            ElementShape::Nested(_) => ElementKind::Other,
        }
    }

    fn is_nested(&self) -> bool {
        matches!(self, ElementShape::Nested(_))
    }
}

impl fmt::Display for ElementShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementShape::Nested(nested) => write!(f, "{nested}"),
            builtin => write!(f, "{}", builtin.kind()),
        }
    }
}

/// How a dictionary field treats its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DictionaryMode {
    /// Raw document value per key.
    Dynamic,
    /// Every value is deserialized as this nested type.
    Typed(TypeRef),
}

/// The resolved kind of conversion a field requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Shape {
    Scalar,
    Array1D(ElementShape),
    Array2D(ElementShape),
    /// One-dimensional, into a growable sequence.
    List(ElementShape),
    Dictionary(DictionaryMode),
    Nested(TypeRef),
}

impl Shape {
    /// Name of the conversion operation this shape runs.
    pub fn operation(&self) -> &'static str {
        match self {
            Shape::Scalar => "coerce",
            Shape::Array1D(e) if e.is_nested() => "object array",
            Shape::Array1D(_) => "array",
            Shape::Array2D(e) if e.is_nested() => "object grid",
            Shape::Array2D(_) => "grid",
            Shape::List(e) if e.is_nested() => "object list",
            Shape::List(_) => "list",
            Shape::Dictionary(DictionaryMode::Dynamic) => "raw dictionary",
            Shape::Dictionary(DictionaryMode::Typed(_)) => "typed dictionary",
            Shape::Nested(_) => "nested",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar => write!(f, "Scalar"),
            Shape::Array1D(e) => write!(f, "Array1D({e})"),
            Shape::Array2D(e) => write!(f, "Array2D({e})"),
            Shape::List(e) => write!(f, "List({e})"),
            Shape::Dictionary(DictionaryMode::Dynamic) => write!(f, "Dictionary(Dynamic)"),
            Shape::Dictionary(DictionaryMode::Typed(t)) => write!(f, "Dictionary(Typed({t}))"),
            Shape::Nested(t) => write!(f, "Nested({t})"),
        }
    }
}

/// Extraction instruction for one non-ignored field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPlanEntry {
    /// Declared field name
    field: &'static str,

    /// Document key the field is read from
    effective_name: String,

    shape: Shape,
}

impl FieldPlanEntry {
    pub fn new(field: &'static str, effective_name: String, shape: Shape) -> Self {
        FieldPlanEntry {
            field,
            effective_name,
            shape,
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn effective_name(&self) -> &str {
        &self.effective_name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

/// Pre-computed extraction plan for a declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionPlan {
    type_name: &'static str,

    /// Entries in field-declaration order; ignored fields are absent
    entries: Vec<FieldPlanEntry>,
}

impl ExtractionPlan {
    pub(crate) fn new(type_name: &'static str, entries: Vec<FieldPlanEntry>) -> Self {
        ExtractionPlan { type_name, entries }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn entries(&self) -> &[FieldPlanEntry] {
        &self.entries
    }

    /// Get the entry for a declared field, if the field is not ignored
    pub fn entry(&self, field: &str) -> Option<&FieldPlanEntry> {
        self.entries.iter().find(|e| e.field == field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The plan as JSON, for inspection and debugging
    pub fn to_json(&self) -> Value {
        let entries = self
            .entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "field": e.field,
                    "key": e.effective_name,
                    "shape": e.shape.to_string(),
                    "operation": e.shape.operation(),
                })
            })
            .collect();

        serde_json::json!({
            "type": self.type_name,
            "fields": Value::Array(entries),
        })
    }
}
