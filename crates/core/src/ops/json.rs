use std::fmt;

use serde_json::{Map, Value};

use crate::number::Number;
use crate::ops::{DataResult, DynamicOps, OpsError};

/// JSON backend over `serde_json::Value`.
///
/// Numbers lose their width on the way in; converting out picks the
/// narrowest tag kind that holds the value exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonOps;

impl JsonOps {
    pub const INSTANCE: JsonOps = JsonOps;
}

impl fmt::Display for JsonOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JSON")
    }
}

fn object_key(key: &Value) -> Option<String> {
    match key {
        Value::String(key) => Some(key.clone()),
        _ => None,
    }
}

fn narrowest<U: DynamicOps>(out: &U, number: &serde_json::Number) -> U::Value {
    if let Some(value) = number.as_i64() {
        if let Ok(value) = i8::try_from(value) {
            return out.create_byte(value);
        }
        if let Ok(value) = i16::try_from(value) {
            return out.create_short(value);
        }
        if let Ok(value) = i32::try_from(value) {
            return out.create_int(value);
        }
        return out.create_long(value);
    }
    let value = number.as_f64().unwrap_or_default();
    if f64::from(value as f32) == value {
        out.create_float(value as f32)
    } else {
        out.create_double(value)
    }
}

impl DynamicOps for JsonOps {
    type Value = Value;

    fn empty(&self) -> Value {
        Value::Null
    }

    fn empty_list(&self) -> Value {
        Value::Array(Vec::new())
    }

    fn empty_map(&self) -> Value {
        Value::Object(Map::new())
    }

    fn create_numeric(&self, number: Number) -> Value {
        match number {
            Number::Byte(v) => Value::from(v),
            Number::Short(v) => Value::from(v),
            Number::Int(v) => Value::from(v),
            Number::Long(v) => Value::from(v),
            Number::Float(v) => Value::from(f64::from(v)),
            Number::Double(v) => Value::from(v),
        }
    }

    fn create_boolean(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    fn create_string(&self, value: &str) -> Value {
        Value::String(value.to_string())
    }

    fn create_list(&self, values: Vec<Value>) -> Value {
        Value::Array(values)
    }

    fn create_map(&self, entries: Vec<(Value, Value)>) -> Value {
        let mut object = Map::new();
        for (key, value) in entries {
            match key {
                Value::String(key) => {
                    object.insert(key, value);
                }
                Value::Number(key) => {
                    object.insert(key.to_string(), value);
                }
                Value::Bool(key) => {
                    object.insert(key.to_string(), value);
                }
                other => tracing::warn!(key = %other, "skipping non-primitive object key"),
            }
        }
        Value::Object(object)
    }

    fn get_number_value(&self, input: &Value) -> DataResult<Number> {
        match input {
            Value::Number(number) => Ok(match number.as_i64() {
                Some(value) => Number::Long(value),
                None => Number::Double(number.as_f64().unwrap_or_default()),
            }),
            Value::Bool(value) => Ok(Number::Byte(i8::from(*value))),
            other => Err(OpsError::wrong_shape(format!("Not a number: {other}"))),
        }
    }

    fn get_boolean_value(&self, input: &Value) -> DataResult<bool> {
        match input {
            Value::Bool(value) => Ok(*value),
            Value::Number(_) => self
                .get_number_value(input)
                .map(Number::as_boolean)
                .map_err(OpsError::retype),
            other => Err(OpsError::wrong_shape(format!("Not a boolean: {other}"))),
        }
    }

    fn get_string_value(&self, input: &Value) -> DataResult<String> {
        match input {
            Value::String(value) => Ok(value.clone()),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(OpsError::wrong_shape(format!("Not a string: {other}"))),
        }
    }

    fn get_stream(&self, input: &Value) -> DataResult<Vec<Value>> {
        match input {
            Value::Array(values) => Ok(values.clone()),
            other => Err(OpsError::wrong_shape(format!("Not a json array: {other}"))),
        }
    }

    fn get_map_values(&self, input: &Value) -> DataResult<Vec<(Value, Value)>> {
        match input {
            Value::Object(object) => Ok(object
                .iter()
                .map(|(key, value)| (Value::String(key.clone()), value.clone()))
                .collect()),
            other => Err(OpsError::wrong_shape(format!("Not a JSON object: {other}"))),
        }
    }

    fn merge_to_list(&self, list: Value, value: Value) -> DataResult<Value> {
        match list {
            Value::Null => Ok(Value::Array(vec![value])),
            Value::Array(mut values) => {
                values.push(value);
                Ok(Value::Array(values))
            }
            other => Err(OpsError::wrong_shape(format!(
                "mergeToList called with not a list: {other}"
            ))
            .with_partial(other)),
        }
    }

    fn merge_to_map(&self, map: Value, key: Value, value: Value) -> DataResult<Value> {
        if !matches!(map, Value::Null | Value::Object(_)) {
            return Err(
                OpsError::wrong_shape(format!("mergeToMap called with not a map: {map}"))
                    .with_partial(map),
            );
        }
        let Some(name) = object_key(&key) else {
            return Err(OpsError::non_string_keys(
                format!("key is not a string: {key}"),
                vec![key],
                map,
            ));
        };
        let mut object = match map {
            Value::Object(object) => object,
            _ => Map::new(),
        };
        object.insert(name, value);
        Ok(Value::Object(object))
    }

    fn merge_to_map_entries(&self, map: Value, entries: Vec<(Value, Value)>) -> DataResult<Value> {
        let mut object = match map {
            Value::Null => Map::new(),
            Value::Object(object) => object,
            other => {
                return Err(OpsError::wrong_shape(format!(
                    "mergeToMap called with not a map: {other}"
                ))
                .with_partial(other))
            }
        };
        let mut rejected = Vec::new();
        for (key, value) in entries {
            match object_key(&key) {
                Some(name) => {
                    object.insert(name, value);
                }
                None => rejected.push(key),
            }
        }
        let merged = Value::Object(object);
        if rejected.is_empty() {
            return Ok(merged);
        }
        let listed = rejected
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Err(OpsError::non_string_keys(
            format!("some keys are not strings: [{listed}]"),
            rejected,
            merged,
        ))
    }

    fn remove(&self, input: &Value, key: &str) -> Value {
        match input {
            Value::Object(object) => {
                let mut copy = object.clone();
                copy.remove(key);
                Value::Object(copy)
            }
            other => other.clone(),
        }
    }

    fn convert_to<U: DynamicOps>(&self, out: &U, input: &Value) -> U::Value {
        match input {
            Value::Null => out.empty(),
            Value::Bool(value) => out.create_boolean(*value),
            Value::Number(number) => narrowest(out, number),
            Value::String(value) => out.create_string(value),
            Value::Array(_) => self.convert_list(out, input),
            Value::Object(_) => self.convert_map(out, input),
        }
    }
}

#[cfg(test)]
#[path = "../tests/json_ops_tests.rs"]
mod tests;
