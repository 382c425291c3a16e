//! First-class references to declared Rust types.
//!
//! The analyzer never inspects type names. Every field type reports its
//! structure through [`DeclaredType`], including the element or value type of
//! containers, so array and dictionary shapes can be checked statically.

use crate::schema::{Dimension, ElementKind};
use serde::{Serialize, Serializer};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a Rust type plus its display name.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
}

impl TypeRef {
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeRef {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// What a single element (array cell, dictionary value, scalar) converts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Int,
    Boolean,
    Float,
    Double,
    Char,
    String,
    /// The untouched document value.
    Raw,
    Nested(TypeRef),
}

impl ElementType {
    /// The directive kind that selects this element, if any does.
    pub fn kind(&self) -> Option<ElementKind> {
        match self {
            ElementType::Int => Some(ElementKind::Int),
            ElementType::Boolean => Some(ElementKind::Boolean),
            ElementType::Float => Some(ElementKind::Float),
            ElementType::Double => Some(ElementKind::Double),
            ElementType::Char => Some(ElementKind::Char),
            ElementType::String => Some(ElementKind::String),
            ElementType::Nested(_) => Some(ElementKind::Other),
            ElementType::Raw => None,
        }
    }
}

/// Structure of a declared field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeForm {
    /// A primitive or a raw document value.
    Scalar(ElementType),
    /// A type with the nested deserialization capability.
    Nested(TypeRef),
    /// `Box<[E]>`, `Vec<E>` (growable) or `Grid<E>` (two-dimensional).
    Sequence {
        element: ElementType,
        dimension: Dimension,
        growable: bool,
    },
    /// A string-keyed map.
    Map { value: ElementType },
}

/// A field's declared type as seen by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredType {
    name: &'static str,
    form: TypeForm,
    optional: bool,
}

impl DeclaredType {
    pub fn of<T: ?Sized>(form: TypeForm) -> Self {
        DeclaredType {
            name: std::any::type_name::<T>(),
            form,
            optional: false,
        }
    }

    pub fn nested<T: 'static>() -> Self {
        Self::of::<T>(TypeForm::Nested(TypeRef::of::<T>()))
    }

    /// The same structure wrapped in `Option<_>`, named `T`.
    pub fn optional<T: ?Sized>(self) -> Self {
        DeclaredType {
            name: std::any::type_name::<T>(),
            optional: true,
            ..self
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn form(&self) -> TypeForm {
        self.form
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}
