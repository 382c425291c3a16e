//! Schema analysis: resolves each field's directives into exactly one
//! extraction shape and collects them into an [`ExtractionPlan`].

use crate::error::SchemaError;
use crate::extract::{DictionaryMode, ElementShape, ExtractionPlan, FieldPlanEntry, Shape};
use crate::schema::{
    ArrayArgs, DeclaredType, DictionaryArgs, Dimension, Directive, ElementKind, ElementType,
    FieldSpec, Schema, TypeForm,
};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Build the extraction plan for `T`.
///
/// All-or-nothing: the first field that fails to resolve rejects the type.
pub fn analyze<T: 'static>(schema: &Schema<T>) -> Result<ExtractionPlan, SchemaError> {
    analyze_fields(std::any::type_name::<T>(), schema.fields())
}

pub(crate) fn analyze_fields<'a>(
    type_name: &'static str,
    fields: impl Iterator<Item = &'a FieldSpec>,
) -> Result<ExtractionPlan, SchemaError> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for spec in fields {
        if !seen.insert(spec.name()) {
            return Err(SchemaError::DuplicateField {
                type_name,
                field: spec.name(),
            });
        }

        match resolve_field(type_name, spec) {
            Ok(Some(entry)) => {
                trace!(type_name, field = spec.name(), shape = %entry.shape(), "resolved field");
                entries.push(entry);
            }
            Ok(None) => trace!(type_name, field = spec.name(), "ignored field"),
            Err(err) => {
                debug!(type_name, error = %err, "rejected schema");
                return Err(err);
            }
        }
    }

    Ok(ExtractionPlan::new(type_name, entries))
}

/// Resolve a single field. `Ok(None)` means the field is ignored.
pub fn resolve_field(
    type_name: &'static str,
    spec: &FieldSpec,
) -> Result<Option<FieldPlanEntry>, SchemaError> {
    let directives = spec.directives();

    // Ignore short-circuits everything else, including conflicts.
    if directives.iter().any(|d| matches!(d, Directive::Ignore)) {
        return Ok(None);
    }

    let field = FieldContext {
        type_name,
        name: spec.name(),
        declared: spec.declared(),
    };

    let mut claims = directives.iter().filter(|d| d.claims_shape());
    let claimed = claims.next();
    if claims.next().is_some() {
        return Err(SchemaError::ConflictingShapes {
            type_name,
            field: field.name,
        });
    }

    let shape = match claimed {
        Some(Directive::DictionaryShape(args)) => field.dictionary_shape(args)?,
        Some(Directive::ArrayShape(args)) => field.array_shape(args)?,
        _ => field.default_shape()?,
    };

    Ok(Some(FieldPlanEntry::new(
        spec.name(),
        effective_name(spec.name(), directives),
        shape,
    )))
}

/// Positional renames apply first, `json_name` options override them.
fn effective_name(declared: &str, directives: &[Directive]) -> String {
    let renames = || {
        directives.iter().filter_map(|d| match d {
            Directive::Rename(args) => Some(args),
            _ => None,
        })
    };

    let positional = renames().filter_map(|args| args.positional.as_deref()).last();
    let named = renames().filter_map(|args| args.json_name.as_deref()).last();

    named.or(positional).unwrap_or(declared).to_owned()
}

struct FieldContext<'a> {
    type_name: &'static str,
    name: &'static str,
    declared: &'a DeclaredType,
}

impl FieldContext<'_> {
    fn dictionary_shape(&self, args: &DictionaryArgs) -> Result<Shape, SchemaError> {
        let TypeForm::Map { value } = self.declared.form() else {
            return Err(SchemaError::NotAMap {
                type_name: self.type_name,
                field: self.name,
                declared: self.declared.name(),
            });
        };

        match (args.dynamic, value) {
            (true, ElementType::Raw) => Ok(Shape::Dictionary(DictionaryMode::Dynamic)),
            (false, ElementType::Nested(nested)) => {
                Ok(Shape::Dictionary(DictionaryMode::Typed(nested)))
            }
            (dynamic, _) => Err(SchemaError::DictionaryValue {
                type_name: self.type_name,
                field: self.name,
                mode: if dynamic { "dynamic" } else { "typed" },
                declared: self.declared.name(),
            }),
        }
    }

    fn array_shape(&self, args: &ArrayArgs) -> Result<Shape, SchemaError> {
        let TypeForm::Sequence {
            element,
            dimension,
            growable,
        } = self.declared.form()
        else {
            return Err(SchemaError::NotASequence {
                type_name: self.type_name,
                field: self.name,
                declared: self.declared.name(),
            });
        };

        if args.dimension != dimension {
            return Err(SchemaError::DimensionMismatch {
                type_name: self.type_name,
                field: self.name,
                directive: args.dimension,
                expected: dimension,
                declared: self.declared.name(),
            });
        }

        let kind = args.resolved_kind();
        let element = self.element_shape(kind, element)?;

        Ok(match (dimension, growable) {
            (Dimension::Two, _) => Shape::Array2D(element),
            (Dimension::One, true) => Shape::List(element),
            (Dimension::One, false) => Shape::Array1D(element),
        })
    }

    fn element_shape(
        &self,
        kind: ElementKind,
        element: ElementType,
    ) -> Result<ElementShape, SchemaError> {
        let resolved = match (kind, element) {
            (ElementKind::Other, ElementType::Nested(nested)) => Some(ElementShape::Nested(nested)),
            (ElementKind::Other, _) => None,
            (kind, element) if element.kind() == Some(kind) => ElementShape::builtin(kind),
            _ => None,
        };

        resolved.ok_or(SchemaError::UnmappedElementKind {
            type_name: self.type_name,
            field: self.name,
            kind,
            declared: self.declared.name(),
        })
    }

    fn default_shape(&self) -> Result<Shape, SchemaError> {
        match self.declared.form() {
            // Structural override: deserializable types are always nested.
            TypeForm::Nested(nested) => Ok(Shape::Nested(nested)),
            TypeForm::Scalar(_) => Ok(Shape::Scalar),
            TypeForm::Sequence { .. } | TypeForm::Map { .. } => Err(SchemaError::MissingShape {
                type_name: self.type_name,
                field: self.name,
                declared: self.declared.name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RenameArgs, TypeRef};

    struct Leaf;

    fn spec(name: &'static str, form: TypeForm, directives: Vec<Directive>) -> FieldSpec {
        FieldSpec::new(name, DeclaredType::of::<()>(form), directives)
    }

    fn int_list() -> TypeForm {
        TypeForm::Sequence {
            element: ElementType::Int,
            dimension: Dimension::One,
            growable: true,
        }
    }

    fn resolve(spec: &FieldSpec) -> Result<Option<FieldPlanEntry>, SchemaError> {
        resolve_field("Test", spec)
    }

    #[test]
    fn test_plain_field_is_scalar() {
        let entry = resolve(&spec("id", TypeForm::Scalar(ElementType::Int), vec![]))
            .unwrap()
            .unwrap();
        assert_eq!(entry.effective_name(), "id");
        assert_eq!(entry.shape(), &Shape::Scalar);
    }

    #[test]
    fn test_ignore_wins_over_everything() {
        let field = spec(
            "points",
            TypeForm::Scalar(ElementType::Int),
            vec![
                Directive::rename("pts"),
                Directive::array(ElementKind::Int),
                Directive::dictionary(),
                Directive::Ignore,
            ],
        );
        assert_eq!(resolve(&field).unwrap(), None);
    }

    #[test]
    fn test_named_rename_overrides_positional() {
        let both = Directive::Rename(RenameArgs::new("pts").json_name("points"));
        let field = spec("p", TypeForm::Scalar(ElementType::Int), vec![both]);
        assert_eq!(resolve(&field).unwrap().unwrap().effective_name(), "points");

        // Order of separate directives does not matter.
        let field = spec(
            "p",
            TypeForm::Scalar(ElementType::Int),
            vec![Directive::json_name("points"), Directive::rename("pts")],
        );
        assert_eq!(resolve(&field).unwrap().unwrap().effective_name(), "points");
    }

    #[test]
    fn test_array_kind_defaults_to_int() {
        let field = spec(
            "xs",
            int_list(),
            vec![Directive::ArrayShape(ArrayArgs::new(Dimension::One))],
        );
        assert_eq!(
            resolve(&field).unwrap().unwrap().shape(),
            &Shape::List(ElementShape::Int)
        );
    }

    #[test]
    fn test_fixed_and_grid_shapes() {
        let fixed = spec(
            "xs",
            TypeForm::Sequence {
                element: ElementType::Char,
                dimension: Dimension::One,
                growable: false,
            },
            vec![Directive::array(ElementKind::Char)],
        );
        assert_eq!(
            resolve(&fixed).unwrap().unwrap().shape(),
            &Shape::Array1D(ElementShape::Char)
        );

        let grid = spec(
            "cells",
            TypeForm::Sequence {
                element: ElementType::Nested(TypeRef::of::<Leaf>()),
                dimension: Dimension::Two,
                growable: false,
            },
            vec![Directive::array_2d(ElementKind::Other)],
        );
        assert_eq!(
            resolve(&grid).unwrap().unwrap().shape(),
            &Shape::Array2D(ElementShape::Nested(TypeRef::of::<Leaf>()))
        );
    }

    #[test]
    fn test_kind_must_match_element() {
        let field = spec("xs", int_list(), vec![Directive::array(ElementKind::String)]);
        assert!(matches!(
            resolve(&field),
            Err(SchemaError::UnmappedElementKind { kind: ElementKind::String, field: "xs", .. })
        ));

        let field = spec("xs", int_list(), vec![Directive::array(ElementKind::Other)]);
        assert!(matches!(
            resolve(&field),
            Err(SchemaError::UnmappedElementKind { kind: ElementKind::Other, .. })
        ));
    }

    #[test]
    fn test_dimension_must_match() {
        let field = spec("xs", int_list(), vec![Directive::array_2d(ElementKind::Int)]);
        assert!(matches!(
            resolve(&field),
            Err(SchemaError::DimensionMismatch {
                directive: Dimension::Two,
                expected: Dimension::One,
                ..
            })
        ));
    }

    #[test]
    fn test_array_on_scalar_is_rejected() {
        let field = spec(
            "x",
            TypeForm::Scalar(ElementType::Int),
            vec![Directive::array(ElementKind::Int)],
        );
        assert!(matches!(resolve(&field), Err(SchemaError::NotASequence { .. })));
    }

    #[test]
    fn test_dictionary_modes() {
        let raw = spec(
            "meta",
            TypeForm::Map { value: ElementType::Raw },
            vec![Directive::dynamic_dictionary()],
        );
        assert_eq!(
            resolve(&raw).unwrap().unwrap().shape(),
            &Shape::Dictionary(DictionaryMode::Dynamic)
        );

        let typed = spec(
            "leaves",
            TypeForm::Map {
                value: ElementType::Nested(TypeRef::of::<Leaf>()),
            },
            vec![Directive::dictionary()],
        );
        assert_eq!(
            resolve(&typed).unwrap().unwrap().shape(),
            &Shape::Dictionary(DictionaryMode::Typed(TypeRef::of::<Leaf>()))
        );
    }

    #[test]
    fn test_dictionary_value_must_fit_mode() {
        let typed_raw = spec(
            "meta",
            TypeForm::Map { value: ElementType::Raw },
            vec![Directive::dictionary()],
        );
        assert!(matches!(
            resolve(&typed_raw),
            Err(SchemaError::DictionaryValue { mode: "typed", .. })
        ));

        let dynamic_nested = spec(
            "meta",
            TypeForm::Map {
                value: ElementType::Nested(TypeRef::of::<Leaf>()),
            },
            vec![Directive::dynamic_dictionary()],
        );
        assert!(matches!(
            resolve(&dynamic_nested),
            Err(SchemaError::DictionaryValue { mode: "dynamic", .. })
        ));

        let not_map = spec("meta", int_list(), vec![Directive::dictionary()]);
        assert!(matches!(resolve(&not_map), Err(SchemaError::NotAMap { .. })));
    }

    #[test]
    fn test_nested_type_is_detected_structurally() {
        let field = spec("child", TypeForm::Nested(TypeRef::of::<Leaf>()), vec![]);
        assert_eq!(
            resolve(&field).unwrap().unwrap().shape(),
            &Shape::Nested(TypeRef::of::<Leaf>())
        );
    }

    #[test]
    fn test_conflicting_shapes() {
        let field = spec(
            "xs",
            int_list(),
            vec![Directive::array(ElementKind::Int), Directive::dictionary()],
        );
        assert!(matches!(resolve(&field), Err(SchemaError::ConflictingShapes { .. })));
    }

    #[test]
    fn test_container_without_directive() {
        let field = spec("xs", int_list(), vec![]);
        assert!(matches!(resolve(&field), Err(SchemaError::MissingShape { .. })));
    }

    #[test]
    fn test_plan_is_all_or_nothing() {
        let fields = vec![
            spec("ok", TypeForm::Scalar(ElementType::Int), vec![]),
            spec("bad", int_list(), vec![]),
        ];
        let err = analyze_fields("Test", fields.iter()).unwrap_err();
        assert_eq!(err.field(), "bad");
    }

    #[test]
    fn test_duplicate_fields() {
        let fields = vec![
            spec("a", TypeForm::Scalar(ElementType::Int), vec![]),
            spec("a", TypeForm::Scalar(ElementType::Int), vec![Directive::rename("b")]),
        ];
        assert!(matches!(
            analyze_fields("Test", fields.iter()),
            Err(SchemaError::DuplicateField { field: "a", .. })
        ));
    }

    #[test]
    fn test_plan_preserves_declaration_order() {
        let fields = vec![
            spec("z", TypeForm::Scalar(ElementType::Int), vec![]),
            spec("skip", TypeForm::Scalar(ElementType::Int), vec![Directive::Ignore]),
            spec("a", TypeForm::Scalar(ElementType::String), vec![]),
        ];
        let plan = analyze_fields("Test", fields.iter()).unwrap();
        let names: Vec<_> = plan.entries().iter().map(|e| e.field()).collect();
        assert_eq!(names, vec!["z", "a"]);
    }
}
