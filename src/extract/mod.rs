//! Extraction plans and the routines compiled from them
//!
//! The analyzer produces one [`ExtractionPlan`] per declared type; a
//! [`Routine`] binds that plan to the type's fields and runs it against
//! documents.

pub mod plan;
pub mod routine;

pub use plan::{DictionaryMode, ElementShape, ExtractionPlan, FieldPlanEntry, Shape};
pub use routine::{Compiled, Routine};
