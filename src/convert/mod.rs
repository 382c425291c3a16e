//! Conversion library
//!
//! Stateless operations mapping a document value onto a native value for one
//! shape. Every operation checks for Null first and returns `None` without
//! looking any further; callers turn that into `None` or the type's default.
//!
//! Element conversion is chosen by the element type (`i32`, `char`, a nested
//! type, ...), so `array::<i32>` is the dedicated integer array conversion and
//! `array::<Leaf>` the nested-object one.

mod grid;
mod value;

pub use grid::Grid;
pub use value::{nested_element, nested_field, ElementValue, FieldValue};

use crate::document::Document;
use crate::error::{DeserializeError, Result};
use indexmap::IndexMap;
use serde_json::Value;

/// The nested deserialization capability.
///
/// Any type implementing it can be a nested field, an array element or a
/// typed dictionary value. Schema-annotated types get it from
/// [`impl_serializable!`](crate::impl_serializable); hand-written
/// implementations register with [`impl_nested!`](crate::impl_nested).
pub trait JsonDeserializable {
    /// Populate `self` from `document`.
    fn deserialize(&mut self, document: &Value) -> Result<()>;
}

/// Fixed-size array: one converted element per source element, in order.
pub fn array<E: ElementValue>(value: &Value) -> Result<Option<Box<[E]>>> {
    if value.is_absent() {
        return Ok(None);
    }
    Ok(Some(collect_elements(value)?.into_boxed_slice()))
}

/// Growable list; same element semantics as [`array`].
pub fn list<E: ElementValue>(value: &Value) -> Result<Option<Vec<E>>> {
    if value.is_absent() {
        return Ok(None);
    }
    collect_elements(value).map(Some)
}

fn collect_elements<E: ElementValue>(value: &Value) -> Result<Vec<E>> {
    let elements = value.elements()?;
    let mut out = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        out.push(E::from_element(element).map_err(|err| err.at_index(index))?);
    }
    Ok(out)
}

/// Rectangular array from an array of rows.
///
/// The outer array must be non-empty and the width is the length of the
/// first row only. Other rows are not checked against it: cells past the
/// width are dropped, and cells missing from a shorter row read as Null and
/// so take the element's absent/default value.
///
/// The result always holds `rows * first_row_width` cells, whatever the
/// later rows contain: a wide first row followed by many empty rows allocates
/// the full product. Bound the input size before feeding untrusted documents
/// to a grid field.
pub fn array_2d<E: ElementValue>(value: &Value) -> Result<Option<Grid<E>>> {
    if value.is_absent() {
        return Ok(None);
    }

    let rows = value.elements()?;
    let Some(first) = rows.first() else {
        return Err(DeserializeError::shape_mismatch_kind(
            "non-empty array",
            "empty array",
        ));
    };
    let width = first.elements().map_err(|err| err.at_index(0))?.len();

    let mut cells = Vec::with_capacity(rows.len() * width);
    for (i, row) in rows.iter().enumerate() {
        for j in 0..width {
            let cell = row.element(j).map_err(|err| err.at_index(i))?;
            let converted = E::from_element(cell).map_err(|err| err.at_index(j).at_index(i))?;
            cells.push(converted);
        }
    }

    Ok(Some(Grid::from_cells(rows.len(), width, cells)))
}

/// Construct a `T` and run its own deserialization against `value`.
///
/// Null yields `None`, which is distinct from a deserialized `T` whose
/// fields all happen to be defaults.
pub fn nested<T>(value: &Value) -> Result<Option<T>>
where
    T: JsonDeserializable + Default,
{
    if value.is_absent() {
        return Ok(None);
    }
    let mut target = T::default();
    target.deserialize(value)?;
    Ok(Some(target))
}

/// Key to converted value, in the source object's key order.
///
/// With `E = Value` this is the dynamic (raw) dictionary; with a nested `E`
/// each value follows the [`nested`] rule, so a Null value becomes the
/// element's absent/default value rather than an error.
pub fn dictionary<E: ElementValue>(value: &Value) -> Result<Option<IndexMap<String, E>>> {
    if value.is_absent() {
        return Ok(None);
    }

    let entries = value.entries()?;
    let mut out = IndexMap::with_capacity(entries.len());
    for (key, entry) in entries {
        out.insert(key.clone(), E::from_element(entry).map_err(|err| err.in_key(key))?);
    }
    Ok(Some(out))
}
