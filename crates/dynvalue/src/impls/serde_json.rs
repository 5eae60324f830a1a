use serde_json::{Map, Number};

use crate::{generic::non_finite_marker, Dict, List, Value};

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(num) => Value::from(&num),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().collect()),
            serde_json::Value::Object(object) => Value::Dict(object.into_iter().collect()),
        }
    }
}

impl From<&Number> for Value {
    fn from(num: &Number) -> Self {
        if let Some(i) = num.as_i64() {
            Value::Int(i)
        } else {
            // NOTE: Integers above `i64::MAX` lose precision. Without `arbitrary_precision`
            // every `Number` is an `i64`, `u64` or `f64`, so `as_f64` is always `Some`
            Value::Float(num.as_f64().expect("Always succeeds"))
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => match non_finite_marker(*f) {
                Some(marker) => serde_json::Value::String(marker.to_owned()),
                None => Number::from_f64(*f)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number),
            },
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(list) => serde_json::Value::from(list),
            Value::Dict(dict) => serde_json::Value::from(dict),
        }
    }
}

impl From<&List> for serde_json::Value {
    fn from(list: &List) -> Self {
        serde_json::Value::Array(list.iter().map(serde_json::Value::from).collect())
    }
}

impl From<&Dict> for serde_json::Value {
    fn from(dict: &Dict) -> Self {
        serde_json::Value::Object(
            dict.iter()
                .map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
                .collect::<Map<_, _>>(),
        )
    }
}
