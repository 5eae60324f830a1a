//! Converting values back into generic input.
use crate::{generic::non_finite_marker, Dict, GenericValue, List, Text, Value};

impl Value {
    /// Convert into a generic value tree.
    ///
    /// Never fails. Non-finite floats become the strings `"NaN"`, `"Infinity"` and
    /// `"-Infinity"`; strings are returned as they are, without base64 decoding.
    #[must_use]
    pub fn to_generic(&self) -> GenericValue {
        match self {
            Value::Null => GenericValue::None,
            Value::Bool(value) => GenericValue::Bool(*value),
            Value::Int(value) => GenericValue::Int(*value),
            Value::Float(value) => match non_finite_marker(*value) {
                Some(marker) => GenericValue::String(Text::from(marker)),
                None => GenericValue::Float(*value),
            },
            Value::String(value) => GenericValue::String(Text::from(value.as_str())),
            Value::List(list) => list.to_generic(),
            Value::Dict(dict) => dict.to_generic(),
        }
    }
}

impl List {
    /// Convert into a generic sequence, preserving order.
    #[must_use]
    pub fn to_generic(&self) -> GenericValue {
        GenericValue::Seq(self.iter().map(Value::to_generic).collect())
    }
}

impl Dict {
    /// Convert into a generic map.
    #[must_use]
    pub fn to_generic(&self) -> GenericValue {
        GenericValue::Map(
            self.iter()
                .map(|(key, value)| (Text::from(key.as_str()), value.to_generic()))
                .collect(),
        )
    }
}

impl From<&Value> for GenericValue {
    fn from(value: &Value) -> Self {
        value.to_generic()
    }
}
