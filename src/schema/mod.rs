//! Schema declarations and analysis
//!
//! Types declare their fields and per-field directives; the analyzer turns a
//! declaration into an immutable extraction plan.

pub mod analyzer;
pub mod builder;
pub mod directive;
pub mod types;

pub use analyzer::{analyze, resolve_field};
pub use builder::{FieldSpec, Schema, Serializable};
pub use directive::{ArrayArgs, DictionaryArgs, Dimension, Directive, ElementKind, RenameArgs};
pub use types::{DeclaredType, ElementType, TypeForm, TypeRef};
