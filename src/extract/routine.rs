//! Plan emission
//!
//! [`Routine`] binds every entry of an [`ExtractionPlan`] to the field it
//! writes, so deserialization runs the plan without any further decisions.

use crate::document::Document;
use crate::error::{DeserializeError, SchemaError};
use crate::extract::{ExtractionPlan, Shape};
use crate::schema::builder::Assign;
use crate::schema::{analyze, Schema, Serializable};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// One `field := extract(document, key, shape)` step.
struct Binding<T> {
    key: String,
    shape: Shape,
    assign: Assign<T>,
}

/// Compiled deserialization routine for `T`.
///
/// Stateless: it only writes into the target it is handed, so one routine is
/// shared by every thread deserializing a `T`.
pub struct Routine<T> {
    plan: ExtractionPlan,
    bindings: Vec<Binding<T>>,
}

impl<T: 'static> Routine<T> {
    /// Analyze `schema` and bind each plan entry to its field.
    pub fn compile(schema: Schema<T>) -> Result<Self, SchemaError> {
        let plan = analyze(&schema)?;

        let mut assigns: HashMap<&'static str, Assign<T>> = schema
            .into_decls()
            .into_iter()
            .map(|decl| {
                let (spec, assign) = decl.into_parts();
                (spec.name(), assign)
            })
            .collect();

        // Field names are unique once analysis succeeded.
        let bindings = plan
            .entries()
            .iter()
            .filter_map(|entry| {
                assigns.remove(entry.field()).map(|assign| Binding {
                    key: entry.effective_name().to_owned(),
                    shape: entry.shape().clone(),
                    assign,
                })
            })
            .collect();

        debug!(
            type_name = plan.type_name(),
            fields = plan.len(),
            "compiled extraction plan"
        );

        Ok(Routine { plan, bindings })
    }

    pub fn plan(&self) -> &ExtractionPlan {
        &self.plan
    }

    /// Populate `target` from `document`, field by field in declaration order.
    ///
    /// The document must be an object. A failing field stops the run; fields
    /// before it have already been written.
    pub fn run(&self, document: &Value, target: &mut T) -> Result<(), DeserializeError> {
        for binding in &self.bindings {
            let value = document.field(&binding.key)?;
            (binding.assign)(target, value, &binding.shape)
                .map_err(|err| err.in_key(&binding.key))?;
        }
        Ok(())
    }
}

/// A [`Serializable`] type with a memoized [`Routine`].
///
/// Implemented by [`impl_serializable!`](crate::impl_serializable), which keeps
/// the routine in a per-type cell compiled on first use.
pub trait Compiled: Serializable {
    fn routine() -> Result<&'static Routine<Self>, SchemaError>;

    /// The type's extraction plan.
    fn plan() -> Result<&'static ExtractionPlan, SchemaError> {
        Self::routine().map(Routine::plan)
    }
}
