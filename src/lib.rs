//! # Anvil - Directive-Driven JSON Deserialization
//!
//! Turns JSON documents into strongly-shaped Rust values. Each declared type
//! lists its fields with per-field directives (rename, ignore, array shape,
//! dictionary mode); a schema analyzer resolves every field to exactly one
//! extraction shape, and the resulting plan is compiled once per type and
//! reused for every document.
//!
//! ## Modules
//!
//! - **schema**: directive vocabulary, field declarations, and the analyzer
//! - **extract**: extraction plans and the routines compiled from them
//! - **convert**: conversion operations for scalars, arrays, grids, lists,
//!   dictionaries and nested types
//! - **document**: the document-model seam over `serde_json::Value`
//!
//! ## Quick Start
//!
//! ```rust
//! use anvil::{Directive, ElementKind, Schema, Serializable};
//! use serde_json::json;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Serializable for Point {
//!     fn declare(schema: Schema<Self>) -> Schema<Self> {
//!         schema.field("x", |p| &mut p.x).field("y", |p| &mut p.y)
//!     }
//! }
//!
//! #[derive(Debug, Default)]
//! struct Route {
//!     name: String,
//!     stops: Vec<Point>,
//!     origin: Option<Point>,
//! }
//!
//! impl Serializable for Route {
//!     fn declare(schema: Schema<Self>) -> Schema<Self> {
//!         schema
//!             .field_with("name", |r| &mut r.name, &[Directive::rename("title")])
//!             .field_with("stops", |r| &mut r.stops, &[Directive::array(ElementKind::Other)])
//!             .field("origin", |r| &mut r.origin)
//!     }
//! }
//!
//! anvil::impl_serializable!(Point, Route);
//!
//! # fn main() -> Result<(), anvil::DeserializeError> {
//! let route: Route = anvil::from_value(&json!({
//!     "title": "loop",
//!     "stops": [{"x": 1, "y": 2}, {"x": 3, "y": 4}],
//!     "origin": null
//! }))?;
//!
//! assert_eq!(route.name, "loop");
//! assert_eq!(route.stops[1], Point { x: 3, y: 4 });
//! assert!(route.origin.is_none());
//! # Ok(())
//! # }
//! ```

use std::io::Read;

pub mod convert;
pub mod deserializer;
pub mod document;
pub mod error;
pub mod extract;
pub mod schema;

mod macros;

// Re-export commonly used types for convenience
pub use convert::{ElementValue, FieldValue, Grid, JsonDeserializable};
pub use deserializer::{DeserializeConfig, Deserializer};
pub use document::Document;
pub use error::{DeserializeError, Path, SchemaError};
pub use extract::{
    Compiled, DictionaryMode, ElementShape, ExtractionPlan, FieldPlanEntry, Routine, Shape,
};
pub use indexmap::IndexMap;
pub use schema::{
    DeclaredType, Dimension, Directive, ElementKind, ElementType, Schema, Serializable, TypeForm,
    TypeRef,
};
pub use serde_json::Value;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::OnceCell;
}

/// Deserialize a `T` from a document value with the default configuration.
pub fn from_value<T>(document: &Value) -> Result<T, DeserializeError>
where
    T: JsonDeserializable + Default,
{
    Deserializer::default().from_value(document)
}

/// Parse JSON text and deserialize a `T` from it.
pub fn from_str<T>(text: &str) -> Result<T, DeserializeError>
where
    T: JsonDeserializable + Default,
{
    Deserializer::default().from_str(text)
}

/// Read one JSON document and deserialize a `T` from it.
pub fn from_reader<T, R: Read>(reader: R) -> Result<T, DeserializeError>
where
    T: JsonDeserializable + Default,
{
    Deserializer::default().from_reader(reader)
}
