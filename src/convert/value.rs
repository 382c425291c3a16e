//! Native Rust types that fields and elements convert into.

use crate::convert::{self, Grid};
use crate::document::Document;
use crate::error::{DeserializeError, Result};
use crate::extract::Shape;
use crate::schema::{DeclaredType, Dimension, ElementType, TypeForm};
use indexmap::IndexMap;
use serde_json::Value;

/// A type a declared field can have.
///
/// `declared_type` is what the analyzer checks directives against; `extract`
/// runs the conversion for the shape the analyzer resolved.
pub trait FieldValue: Sized {
    fn declared_type() -> DeclaredType;

    fn extract(value: &Value, shape: &Shape) -> Result<Self>;
}

/// A type that can sit inside an array, list or dictionary.
pub trait ElementValue: Sized {
    fn element_type() -> ElementType;

    /// Convert one element. Null yields the absent/default value.
    fn from_element(value: &Value) -> Result<Self>;
}

// Only reachable when a field is bound to a shape its type cannot hold.
fn unsupported<T>(shape: &Shape) -> DeserializeError {
    DeserializeError::shape_mismatch_kind(shape.operation(), std::any::type_name::<T>())
}

macro_rules! primitive_values {
    ($($ty:ty => $element:ident, $coerce:ident;)*) => {$(
        impl ElementValue for $ty {
            fn element_type() -> ElementType {
                ElementType::$element
            }

            fn from_element(value: &Value) -> Result<Self> {
                if value.is_absent() {
                    return Ok(Self::default());
                }
                value.$coerce()
            }
        }

        impl FieldValue for $ty {
            fn declared_type() -> DeclaredType {
                DeclaredType::of::<$ty>(TypeForm::Scalar(ElementType::$element))
            }

            fn extract(value: &Value, shape: &Shape) -> Result<Self> {
                match shape {
                    Shape::Scalar => Self::from_element(value),
                    other => Err(unsupported::<Self>(other)),
                }
            }
        }
    )*};
}

primitive_values! {
    i32 => Int, to_int;
    bool => Boolean, to_bool;
    f32 => Float, to_float;
    f64 => Double, to_double;
    char => Char, to_char;
    String => String, to_text;
}

impl ElementValue for Value {
    fn element_type() -> ElementType {
        ElementType::Raw
    }

    fn from_element(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FieldValue for Value {
    fn declared_type() -> DeclaredType {
        DeclaredType::of::<Value>(TypeForm::Scalar(ElementType::Raw))
    }

    fn extract(value: &Value, shape: &Shape) -> Result<Self> {
        match shape {
            Shape::Scalar => Ok(value.clone()),
            other => Err(unsupported::<Self>(other)),
        }
    }
}

impl<E: ElementValue> ElementValue for Option<E> {
    fn element_type() -> ElementType {
        E::element_type()
    }

    fn from_element(value: &Value) -> Result<Self> {
        if value.is_absent() {
            return Ok(None);
        }
        E::from_element(value).map(Some)
    }
}

/// `None` on Null; any other value goes through `F`.
impl<F: FieldValue> FieldValue for Option<F> {
    fn declared_type() -> DeclaredType {
        F::declared_type().optional::<Self>()
    }

    fn extract(value: &Value, shape: &Shape) -> Result<Self> {
        if value.is_absent() {
            return Ok(None);
        }
        F::extract(value, shape).map(Some)
    }
}

impl<E: ElementValue> FieldValue for Box<[E]> {
    fn declared_type() -> DeclaredType {
        DeclaredType::of::<Self>(TypeForm::Sequence {
            element: E::element_type(),
            dimension: Dimension::One,
            growable: false,
        })
    }

    fn extract(value: &Value, shape: &Shape) -> Result<Self> {
        match shape {
            Shape::Array1D(_) => Ok(convert::array(value)?.unwrap_or_default()),
            other => Err(unsupported::<Self>(other)),
        }
    }
}

impl<E: ElementValue> FieldValue for Vec<E> {
    fn declared_type() -> DeclaredType {
        DeclaredType::of::<Self>(TypeForm::Sequence {
            element: E::element_type(),
            dimension: Dimension::One,
            growable: true,
        })
    }

    fn extract(value: &Value, shape: &Shape) -> Result<Self> {
        match shape {
            Shape::List(_) => Ok(convert::list(value)?.unwrap_or_default()),
            other => Err(unsupported::<Self>(other)),
        }
    }
}

impl<E: ElementValue> FieldValue for Grid<E> {
    fn declared_type() -> DeclaredType {
        DeclaredType::of::<Self>(TypeForm::Sequence {
            element: E::element_type(),
            dimension: Dimension::Two,
            growable: false,
        })
    }

    fn extract(value: &Value, shape: &Shape) -> Result<Self> {
        match shape {
            Shape::Array2D(_) => Ok(convert::array_2d(value)?.unwrap_or_default()),
            other => Err(unsupported::<Self>(other)),
        }
    }
}

impl<E: ElementValue> FieldValue for IndexMap<String, E> {
    fn declared_type() -> DeclaredType {
        DeclaredType::of::<Self>(TypeForm::Map {
            value: E::element_type(),
        })
    }

    fn extract(value: &Value, shape: &Shape) -> Result<Self> {
        match shape {
            Shape::Dictionary(_) => Ok(convert::dictionary(value)?.unwrap_or_default()),
            other => Err(unsupported::<Self>(other)),
        }
    }
}

/// [`FieldValue::extract`] for a nested deserializable type; used by
/// [`impl_nested!`](crate::impl_nested).
pub fn nested_field<T>(value: &Value, shape: &Shape) -> Result<T>
where
    T: convert::JsonDeserializable + Default,
{
    match shape {
        Shape::Nested(_) => Ok(convert::nested(value)?.unwrap_or_default()),
        other => Err(unsupported::<T>(other)),
    }
}

/// [`ElementValue::from_element`] for a nested deserializable type.
pub fn nested_element<T>(value: &Value) -> Result<T>
where
    T: convert::JsonDeserializable + Default,
{
    Ok(convert::nested(value)?.unwrap_or_default())
}
