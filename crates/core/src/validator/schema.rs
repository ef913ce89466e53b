//! JSON Schema derived from the expectation, then validated with `jsonschema`.
use jsonschema::Draft;
use serde_json::{json, Map, Value};

use super::{check_depth, ValidationError};

pub fn matches(expected: &Value, actual: &Value) -> Result<bool, ValidationError> {
    let schema = derive_schema(expected)?;
    let validator = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .map_err(|err| ValidationError::InvalidSchema(err.to_string()))?;
    Ok(validator.is_valid(actual))
}

/// Objects require exactly their keys; arrays take the schema of their first element.
pub fn derive_schema(expected: &Value) -> Result<Value, ValidationError> {
    derive(expected, 0)
}

fn derive(expected: &Value, depth: usize) -> Result<Value, ValidationError> {
    check_depth(depth)?;
    Ok(match expected {
        Value::Null => json!({ "type": "null" }),
        Value::Bool(_) => json!({ "type": "boolean" }),
        Value::Number(_) => json!({ "type": "number" }),
        Value::String(_) => json!({ "type": "string" }),
        Value::Array(items) => {
            let item_schema = match items.first() {
                Some(first) => derive(first, depth + 1)?,
                None => json!({}),
            };
            json!({ "type": "array", "items": item_schema })
        }
        Value::Object(map) => {
            let mut properties = Map::with_capacity(map.len());
            for (key, value) in map {
                properties.insert(key.clone(), derive(value, depth + 1)?);
            }
            let required: Vec<&String> = map.keys().collect();
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            })
        }
    })
}
