//! Plan resolution for declared types, and schema errors surfacing at use.

use anvil::{
    Compiled, DeserializeError, Dimension, Directive, DictionaryMode, ElementKind, ElementShape,
    IndexMap, Schema, SchemaError, Serializable, Shape, TypeRef, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[derive(Debug, Default)]
struct Leaf {
    label: String,
}

impl Serializable for Leaf {
    fn declare(schema: Schema<Self>) -> Schema<Self> {
        schema.field("label", |l| &mut l.label)
    }
}

#[derive(Debug, Default)]
struct Tree {
    id: i32,
    weights: Box<[f32]>,
    flags: Vec<bool>,
    matrix: anvil::Grid<f64>,
    leaves: IndexMap<String, Leaf>,
    extra: IndexMap<String, Value>,
    root: Option<Leaf>,
    scratch: Vec<i32>,
}

impl Serializable for Tree {
    fn declare(schema: Schema<Self>) -> Schema<Self> {
        schema
            .field_with("id", |t| &mut t.id, &[Directive::rename("tree_id")])
            .field_with("weights", |t| &mut t.weights, &[Directive::array(ElementKind::Float)])
            .field_with("flags", |t| &mut t.flags, &[Directive::array(ElementKind::Boolean)])
            .field_with("matrix", |t| &mut t.matrix, &[Directive::array_2d(ElementKind::Double)])
            .field_with("leaves", |t| &mut t.leaves, &[Directive::dictionary()])
            .field_with("extra", |t| &mut t.extra, &[Directive::dynamic_dictionary()])
            .field("root", |t| &mut t.root)
            .field_with("scratch", |t| &mut t.scratch, &[Directive::Ignore])
    }
}

anvil::impl_serializable!(Leaf, Tree);

#[test]
fn test_plan_for_every_shape() {
    let plan = Tree::plan().unwrap();
    let leaf = TypeRef::of::<Leaf>();

    let resolved: Vec<_> = plan
        .entries()
        .iter()
        .map(|e| (e.field(), e.effective_name(), e.shape().clone()))
        .collect();

    assert_eq!(
        resolved,
        vec![
            ("id", "tree_id", Shape::Scalar),
            ("weights", "weights", Shape::Array1D(ElementShape::Float)),
            ("flags", "flags", Shape::List(ElementShape::Boolean)),
            ("matrix", "matrix", Shape::Array2D(ElementShape::Double)),
            ("leaves", "leaves", Shape::Dictionary(DictionaryMode::Typed(leaf))),
            ("extra", "extra", Shape::Dictionary(DictionaryMode::Dynamic)),
            ("root", "root", Shape::Nested(leaf)),
        ]
    );
}

#[test]
fn test_plan_json() {
    let json = Tree::plan().unwrap().to_json();

    assert!(json["type"].as_str().unwrap().ends_with("Tree"));
    assert_eq!(json["fields"].as_array().unwrap().len(), 7);
    assert_eq!(
        json["fields"][0],
        json!({"field": "id", "key": "tree_id", "shape": "Scalar", "operation": "coerce"})
    );
    assert_eq!(json["fields"][3]["operation"], "grid");
    assert_eq!(json["fields"][4]["operation"], "typed dictionary");
}

#[test]
fn test_plan_drives_extraction() {
    let tree: Tree = anvil::from_value(&json!({
        "tree_id": 3,
        "id": 99,
        "weights": [0.5, 1],
        "flags": [true],
        "matrix": [[1.5]],
        "leaves": {"l": {"label": "x"}},
        "extra": {"k": "v"},
        "root": {"label": "r"},
        "scratch": [1, 2, 3]
    }))
    .unwrap();

    assert_eq!(tree.id, 3);
    assert_eq!(&*tree.weights, &[0.5, 1.0]);
    assert_eq!(tree.flags, vec![true]);
    assert_eq!(tree.matrix[(0, 0)], 1.5);
    assert_eq!(tree.leaves["l"].label, "x");
    assert_eq!(tree.extra["k"], json!("v"));
    assert_eq!(tree.root.unwrap().label, "r");
    assert!(tree.scratch.is_empty());
}

#[derive(Debug, Default)]
struct Conflicted {
    values: Vec<i32>,
}

impl Serializable for Conflicted {
    fn declare(schema: Schema<Self>) -> Schema<Self> {
        schema.field_with(
            "values",
            |c| &mut c.values,
            &[Directive::array(ElementKind::Int), Directive::dictionary()],
        )
    }
}

#[derive(Debug, Default)]
struct WrongRank {
    values: Vec<i32>,
}

impl Serializable for WrongRank {
    fn declare(schema: Schema<Self>) -> Schema<Self> {
        schema.field_with("values", |w| &mut w.values, &[Directive::array_2d(ElementKind::Int)])
    }
}

#[derive(Debug, Default)]
struct Unshaped {
    id: i32,
    values: Vec<i32>,
}

impl Serializable for Unshaped {
    fn declare(schema: Schema<Self>) -> Schema<Self> {
        schema
            .field("id", |u| &mut u.id)
            .field("values", |u| &mut u.values)
    }
}

anvil::impl_serializable!(Conflicted, WrongRank, Unshaped);

#[test]
fn test_conflicting_shape_directives() {
    let err = Conflicted::plan().unwrap_err();
    assert!(matches!(err, SchemaError::ConflictingShapes { field: "values", .. }));
    assert!(err.type_name().ends_with("Conflicted"));
}

#[test]
fn test_dimension_mismatch() {
    assert!(matches!(
        WrongRank::plan().unwrap_err(),
        SchemaError::DimensionMismatch {
            directive: Dimension::Two,
            expected: Dimension::One,
            ..
        }
    ));
}

#[test]
fn test_schema_error_surfaces_on_deserialize() {
    let err = anvil::from_value::<Unshaped>(&json!({"id": 1})).unwrap_err();

    let DeserializeError::Schema(schema) = err else {
        panic!("expected a schema error, got {err:?}");
    };
    assert!(matches!(schema, SchemaError::MissingShape { field: "values", .. }));

    // Not cached: every use reports it again.
    assert!(Unshaped::plan().is_err());
}
