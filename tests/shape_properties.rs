use anvil::{Directive, ElementKind, Grid, Schema, Serializable};
use proptest::prelude::*;
use serde_json::{json, Value};

#[derive(Debug, Default)]
struct Numbers {
    fixed: Box<[i32]>,
    growable: Vec<Option<i32>>,
    grid: Grid<i32>,
}

impl Serializable for Numbers {
    fn declare(schema: Schema<Self>) -> Schema<Self> {
        schema
            .field_with("fixed", |n| &mut n.fixed, &[Directive::array(ElementKind::Int)])
            .field_with("growable", |n| &mut n.growable, &[Directive::array(ElementKind::Int)])
            .field_with("grid", |n| &mut n.grid, &[Directive::array_2d(ElementKind::Int)])
    }
}

anvil::impl_serializable!(Numbers);

proptest! {
    #[test]
    fn fixed_array_keeps_order_and_length(values in prop::collection::vec(any::<i32>(), 0..64)) {
        let numbers: Numbers = anvil::from_value(&json!({ "fixed": values })).unwrap();
        prop_assert_eq!(&*numbers.fixed, values.as_slice());
    }

    #[test]
    fn null_elements_stay_absent(values in prop::collection::vec(prop::option::of(any::<i32>()), 0..64)) {
        let numbers: Numbers = anvil::from_value(&json!({ "growable": values })).unwrap();
        prop_assert_eq!(numbers.growable, values);
    }

    #[test]
    fn grid_width_follows_first_row(
        rows in prop::collection::vec(prop::collection::vec(any::<i32>(), 0..8), 1..8)
    ) {
        let numbers: Numbers = anvil::from_value(&json!({ "grid": rows })).unwrap();
        let width = rows[0].len();

        prop_assert_eq!(numbers.grid.dimensions(), (rows.len(), width));
        for (i, row) in rows.iter().enumerate() {
            for j in 0..width {
                prop_assert_eq!(numbers.grid[(i, j)], row.get(j).copied().unwrap_or_default());
            }
        }
    }

    #[test]
    fn null_field_is_empty(key in prop::sample::select(vec!["fixed", "growable", "grid"])) {
        let mut document = serde_json::Map::new();
        document.insert(key.to_string(), Value::Null);

        let numbers: Numbers = anvil::from_value(&Value::Object(document)).unwrap();
        prop_assert!(numbers.fixed.is_empty());
        prop_assert!(numbers.growable.is_empty());
        prop_assert!(numbers.grid.is_empty());
    }
}
