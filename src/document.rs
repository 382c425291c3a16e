//! Document model access.
//!
//! The JSON container is `serde_json::Value`, built with `preserve_order` so
//! objects iterate in source order. The rest of the crate reads documents
//! through [`Document`] and never matches on `Value` variants itself.

use crate::error::{DeserializeError, Result};
use serde_json::{Map, Value};

static NULL: Value = Value::Null;

/// Capabilities the deserializer needs from a document value.
///
/// Lookups are lenient the way the document container is: a missing key or
/// an index past the end reads as Null. Coercions are strict and fail with
/// [`DeserializeError::Conversion`] when the value's kind does not match.
pub trait Document {
    /// Value under `key`. Fails if `self` is not an object.
    fn field(&self, key: &str) -> Result<&Value>;

    /// Value at `index`. Fails if `self` is not an array.
    fn element(&self, index: usize) -> Result<&Value>;

    /// Number of elements of an array or entries of an object.
    fn length(&self) -> Result<usize>;

    fn is_absent(&self) -> bool;

    fn elements(&self) -> Result<&[Value]>;

    fn entries(&self) -> Result<&Map<String, Value>>;

    fn to_int(&self) -> Result<i32>;

    fn to_float(&self) -> Result<f32>;

    fn to_double(&self) -> Result<f64>;

    fn to_bool(&self) -> Result<bool>;

    fn to_text(&self) -> Result<String>;

    /// A numeric code point, or a string of exactly one character.
    fn to_char(&self) -> Result<char>;
}

impl Document for Value {
    fn field(&self, key: &str) -> Result<&Value> {
        Ok(self.entries()?.get(key).unwrap_or(&NULL))
    }

    fn element(&self, index: usize) -> Result<&Value> {
        Ok(self.elements()?.get(index).unwrap_or(&NULL))
    }

    fn length(&self) -> Result<usize> {
        match self {
            Value::Array(items) => Ok(items.len()),
            Value::Object(map) => Ok(map.len()),
            other => Err(DeserializeError::shape_mismatch("array or object", other)),
        }
    }

    fn is_absent(&self) -> bool {
        self.is_null()
    }

    fn elements(&self) -> Result<&[Value]> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(DeserializeError::shape_mismatch("array", other)),
        }
    }

    fn entries(&self) -> Result<&Map<String, Value>> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(DeserializeError::shape_mismatch("object", other)),
        }
    }

    fn to_int(&self) -> Result<i32> {
        let whole = match self.as_i64() {
            Some(n) => i32::try_from(n).ok(),
            // Whole numbers written in float form (`2.0`, `1e2`) are still ints.
            None => self.as_f64().and_then(|n| {
                let in_range = n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX);
                (n.fract() == 0.0 && in_range).then_some(n as i32)
            }),
        };
        whole.ok_or_else(|| DeserializeError::conversion("int", self))
    }

    fn to_float(&self) -> Result<f32> {
        self.as_f64()
            .map(|n| n as f32)
            .filter(|n| n.is_finite())
            .ok_or_else(|| DeserializeError::conversion("float", self))
    }

    fn to_double(&self) -> Result<f64> {
        self.as_f64()
            .ok_or_else(|| DeserializeError::conversion("double", self))
    }

    fn to_bool(&self) -> Result<bool> {
        self.as_bool()
            .ok_or_else(|| DeserializeError::conversion("boolean", self))
    }

    fn to_text(&self) -> Result<String> {
        self.as_str()
            .map(str::to_owned)
            .ok_or_else(|| DeserializeError::conversion("string", self))
    }

    fn to_char(&self) -> Result<char> {
        let narrowed = match self {
            Value::Number(n) => n
                .as_u64()
                .and_then(|code| u32::try_from(code).ok())
                .and_then(char::from_u32),
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        };
        narrowed.ok_or_else(|| DeserializeError::conversion("char", self))
    }
}

/// JSON kind name of a value.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Kind name plus the value itself for scalars, used in conversion errors.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        other => kind_name(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_key_reads_as_null() {
        let doc = json!({"a": 1});
        assert!(doc.field("b").unwrap().is_absent());
        assert_eq!(doc.field("a").unwrap().to_int().unwrap(), 1);
    }

    #[test]
    fn test_index_past_end_reads_as_null() {
        let doc = json!([1, 2]);
        assert_eq!(doc.element(1).unwrap().to_int().unwrap(), 2);
        assert!(doc.element(5).unwrap().is_absent());
    }

    #[test]
    fn test_lookup_on_wrong_kind() {
        let err = json!(3).field("a").unwrap_err();
        assert!(matches!(
            err,
            DeserializeError::ShapeMismatch { expected: "object", found: "number", .. }
        ));

        let err = json!({"a": 1}).element(0).unwrap_err();
        assert!(matches!(
            err,
            DeserializeError::ShapeMismatch { expected: "array", found: "object", .. }
        ));
    }

    #[test]
    fn test_length() {
        assert_eq!(json!([1, 2, 3]).length().unwrap(), 3);
        assert_eq!(json!({"a": 1}).length().unwrap(), 1);
        assert!(json!("abc").length().is_err());
    }

    #[test]
    fn test_int_coercion_is_strict() {
        assert_eq!(json!(-7).to_int().unwrap(), -7);
        assert!(json!(1.5).to_int().is_err());
        assert!(json!("1").to_int().is_err());
        assert!(json!(3_000_000_000i64).to_int().is_err());

        assert_eq!(json!(2.0).to_int().unwrap(), 2);
        assert_eq!(json!(1e2).to_int().unwrap(), 100);
        assert_eq!(json!(-2147483648.0).to_int().unwrap(), i32::MIN);
        assert!(json!(3e9).to_int().is_err());
    }

    #[test]
    fn test_float_and_double() {
        assert_eq!(json!(1.5).to_float().unwrap(), 1.5f32);
        assert_eq!(json!(2).to_double().unwrap(), 2.0);
        assert!(json!(true).to_double().is_err());
    }

    #[test]
    fn test_float_out_of_range() {
        let err = json!(1e300).to_float().unwrap_err();
        assert!(matches!(err, DeserializeError::Conversion { expected: "float", .. }));
        assert_eq!(json!(1e300).to_double().unwrap(), 1e300);
        assert!(json!(-3.5e38).to_float().is_err());
    }

    #[test]
    fn test_bool_and_text() {
        assert!(json!(true).to_bool().unwrap());
        assert!(json!(1).to_bool().is_err());
        assert_eq!(json!("hi").to_text().unwrap(), "hi");
        assert!(json!(null).to_text().is_err());
    }

    #[test]
    fn test_char_narrowing() {
        assert_eq!(json!(65).to_char().unwrap(), 'A');
        assert_eq!(json!("z").to_char().unwrap(), 'z');
        assert!(json!("zz").to_char().is_err());
        assert!(json!(-1).to_char().is_err());
        assert!(json!(0xD800).to_char().is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&json!(1.5)), "number 1.5");
        assert_eq!(describe(&json!([1])), "array");
        assert_eq!(kind_name(&json!(null)), "null");
    }
}
