use serde_json::Value;
use svcprobe_common::FlexibleOptions;

use super::{check_depth, ValidationError};

/// Positional comparison with optional type checks and tolerance for extra fields.
pub fn matches(expected: &Value, actual: &Value, options: FlexibleOptions) -> Result<bool, ValidationError> {
    compare(expected, actual, options, 0)
}

fn compare(
    expected: &Value,
    actual: &Value,
    options: FlexibleOptions,
    depth: usize,
) -> Result<bool, ValidationError> {
    check_depth(depth)?;
    match (expected, actual) {
        (Value::Array(expected), Value::Array(actual)) => {
            if expected.len() != actual.len() {
                return Ok(false);
            }
            for (e, a) in expected.iter().zip(actual) {
                if !compare(e, a, options, depth + 1)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Object(expected), Value::Object(actual)) => {
            if !options.allow_extra_fields && expected.len() != actual.len() {
                return Ok(false);
            }
            for (key, e) in expected {
                match actual.get(key) {
                    Some(a) if compare(e, a, options, depth + 1)? => {}
                    _ => return Ok(false),
                }
            }
            Ok(true)
        }
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => Ok(false),
        (expected, actual) => Ok(!options.type_strict || same_primitive_type(expected, actual)),
    }
}

fn same_primitive_type(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Null, Value::Null)
            | (Value::Bool(_), Value::Bool(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
    )
}
