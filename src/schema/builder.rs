//! Field declarations for schema-annotated types.
//!
//! A type becomes a schema root by implementing [`Serializable`]: it lists its
//! fields in declaration order, each with an accessor and its directives.
//!
//! ```rust
//! use anvil::{Directive, ElementKind, Schema, Serializable};
//!
//! #[derive(Debug, Default)]
//! struct Track {
//!     title: String,
//!     points: Vec<i32>,
//!     cached: bool,
//! }
//!
//! impl Serializable for Track {
//!     fn declare(schema: Schema<Self>) -> Schema<Self> {
//!         schema
//!             .field("title", |t| &mut t.title)
//!             .field_with("points", |t| &mut t.points, &[
//!                 Directive::rename("pts"),
//!                 Directive::array(ElementKind::Int),
//!             ])
//!             .field_with("cached", |t| &mut t.cached, &[Directive::Ignore])
//!     }
//! }
//!
//! anvil::impl_serializable!(Track);
//! ```

use crate::convert::FieldValue;
use crate::error::DeserializeError;
use crate::extract::Shape;
use crate::schema::{DeclaredType, Directive};
use serde_json::Value;

/// Marks a type as a schema root and declares its fields.
///
/// Pair it with [`impl_serializable!`](crate::impl_serializable) to get the
/// memoized deserialization routine.
pub trait Serializable: Default + Sized + 'static {
    /// Declare fields on `schema`, in declaration order.
    fn declare(schema: Schema<Self>) -> Schema<Self>;
}

/// Writes one converted value into its field of `T`.
pub(crate) type Assign<T> =
    Box<dyn Fn(&mut T, &Value, &Shape) -> Result<(), DeserializeError> + Send + Sync>;

/// The part of a field declaration the analyzer reads.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    declared: DeclaredType,
    directives: Vec<Directive>,
}

impl FieldSpec {
    pub fn new(name: &'static str, declared: DeclaredType, directives: Vec<Directive>) -> Self {
        FieldSpec {
            name,
            declared,
            directives,
        }
    }

    /// Declared field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declared(&self) -> &DeclaredType {
        &self.declared
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

pub(crate) struct FieldDecl<T> {
    spec: FieldSpec,
    assign: Assign<T>,
}

impl<T> FieldDecl<T> {
    pub(crate) fn into_parts(self) -> (FieldSpec, Assign<T>) {
        (self.spec, self.assign)
    }
}

/// Ordered field declarations of `T`.
pub struct Schema<T> {
    fields: Vec<FieldDecl<T>>,
}

impl<T: 'static> Schema<T> {
    pub fn new() -> Self {
        Schema { fields: Vec::new() }
    }

    /// Declare a field with no directives.
    pub fn field<F, A>(self, name: &'static str, access: A) -> Self
    where
        F: FieldValue + 'static,
        A: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        self.field_with(name, access, &[])
    }

    /// Declare a field carrying `directives`.
    pub fn field_with<F, A>(mut self, name: &'static str, access: A, directives: &[Directive]) -> Self
    where
        F: FieldValue + 'static,
        A: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        let spec = FieldSpec::new(name, F::declared_type(), directives.to_vec());
        let assign: Assign<T> = Box::new(move |target, value, shape| {
            *access(target) = F::extract(value, shape)?;
            Ok(())
        });
        self.fields.push(FieldDecl { spec, assign });
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().map(|decl| &decl.spec)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn into_decls(self) -> Vec<FieldDecl<T>> {
        self.fields
    }
}

impl<T: Serializable> Schema<T> {
    /// The schema `T` declares for itself.
    pub fn declared() -> Self {
        T::declare(Schema::new())
    }
}

impl<T: 'static> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}
