//! Shape equality: same nesting, same keys, same array lengths. Leaf values are ignored.
use serde_json::Value;

use super::{check_depth, ValidationError};

pub fn matches(expected: &Value, actual: &Value) -> Result<bool, ValidationError> {
    same_shape(expected, actual, 0)
}

fn same_shape(expected: &Value, actual: &Value, depth: usize) -> Result<bool, ValidationError> {
    check_depth(depth)?;
    match (expected, actual) {
        (Value::Null, Value::Null) => Ok(true),
        (Value::Null, _) | (_, Value::Null) => Ok(false),
        (Value::Array(expected), Value::Array(actual)) => {
            if expected.len() != actual.len() {
                return Ok(false);
            }
            for (e, a) in expected.iter().zip(actual) {
                if !same_shape(e, a, depth + 1)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Object(expected), Value::Object(actual)) => {
            if expected.len() != actual.len() {
                return Ok(false);
            }
            for (key, e) in expected {
                match actual.get(key) {
                    Some(a) if same_shape(e, a, depth + 1)? => {}
                    _ => return Ok(false),
                }
            }
            Ok(true)
        }
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => Ok(false),
        // Two primitives match whatever their values or types.
        _ => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_values_are_ignored() {
        let actual = json!({ "a": 1, "b": [1, 2] });
        assert!(matches(&json!({ "a": 99, "b": [7, 8] }), &actual).unwrap());
        assert!(matches(&json!({ "a": "text", "b": [true, null] }), &json!({ "a": 1, "b": [false, null] })).unwrap());
    }

    #[test]
    fn test_array_length_matters() {
        let actual = json!({ "a": 1, "b": [1, 2] });
        assert!(!matches(&json!({ "a": 1, "b": [1, 2, 3] }), &actual).unwrap());
    }

    #[test]
    fn test_key_sets_must_be_identical() {
        assert!(!matches(&json!({ "a": 1, "b": 2 }), &json!({ "a": 1, "b": 2, "c": 3 })).unwrap());
        assert!(!matches(&json!({ "a": 1, "b": 2 }), &json!({ "a": 1, "c": 2 })).unwrap());
        assert!(matches(&json!({ "b": 2, "a": 1 }), &json!({ "a": 1, "b": 2 })).unwrap());
    }

    #[test]
    fn test_null_and_kind_mismatches() {
        assert!(matches(&json!(null), &json!(null)).unwrap());
        assert!(!matches(&json!(null), &json!(0)).unwrap());
        assert!(!matches(&json!({ "a": 1 }), &json!({ "a": null })).unwrap());
        assert!(!matches(&json!([]), &json!({})).unwrap());
        assert!(!matches(&json!({ "a": [] }), &json!({ "a": "[]" })).unwrap());
    }
}
