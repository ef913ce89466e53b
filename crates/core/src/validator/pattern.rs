//! Wildcard patterns derived from the expectation.
use serde_json::{Map, Value};

use super::{check_depth, ValidationError};

pub const WILDCARD: &str = "*";

pub fn matches(expected: &Value, actual: &Value) -> Result<bool, ValidationError> {
    let pattern = derive_pattern(expected)?;
    matches_pattern(&pattern, actual)
}

/// Leaves become `"*"`, every array element becomes `"*"`, nulls stay null.
pub fn derive_pattern(expected: &Value) -> Result<Value, ValidationError> {
    derive(expected, 0)
}

fn derive(expected: &Value, depth: usize) -> Result<Value, ValidationError> {
    check_depth(depth)?;
    Ok(match expected {
        Value::Null => Value::Null,
        Value::Array(items) => Value::Array(vec![Value::from(WILDCARD); items.len()]),
        Value::Object(map) => {
            let mut pattern = Map::with_capacity(map.len());
            for (key, value) in map {
                pattern.insert(key.clone(), derive(value, depth + 1)?);
            }
            Value::Object(pattern)
        }
        _ => Value::from(WILDCARD),
    })
}

pub fn matches_pattern(pattern: &Value, actual: &Value) -> Result<bool, ValidationError> {
    check(pattern, actual, 0)
}

fn check(pattern: &Value, actual: &Value, depth: usize) -> Result<bool, ValidationError> {
    check_depth(depth)?;
    match (pattern, actual) {
        (Value::String(marker), _) if marker == WILDCARD => Ok(true),
        (Value::Null, _) => Ok(actual.is_null()),
        (Value::Array(patterns), Value::Array(values)) => {
            if patterns.len() != values.len() {
                return Ok(false);
            }
            for (p, v) in patterns.iter().zip(values) {
                if !check(p, v, depth + 1)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Object(patterns), Value::Object(values)) => {
            if patterns.len() != values.len() {
                return Ok(false);
            }
            for (key, p) in patterns {
                match values.get(key) {
                    Some(v) if check(p, v, depth + 1)? => {}
                    _ => return Ok(false),
                }
            }
            Ok(true)
        }
        (Value::Array(_) | Value::Object(_), _) => Ok(false),
        _ => Ok(pattern == actual),
    }
}
