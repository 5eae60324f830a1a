use core::fmt;
use std::ops::Index;

use crate::{Dict, List};

/// A self-describing value: exactly one of null, bool, integer, float, string, list or dict.
///
/// Strings are always valid UTF-8. Floats may hold NaN and infinities; those have no JSON
/// representation and are extracted as the marker strings `"NaN"`, `"Infinity"` and
/// `"-Infinity"`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(List),
    Dict(Dict),
}

/// The active variant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    String,
    List,
    Dict,
}

impl Kind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::List => "list",
            Kind::Dict => "dict",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The raw payload of a [`Value`], borrowed without any conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(&'a str),
    List(&'a List),
    Dict(&'a Dict),
}

static NULL: Value = Value::Null;

impl Value {
    #[must_use]
    pub fn from_list(list: List) -> Self {
        Value::List(list)
    }

    #[must_use]
    pub fn from_dict(dict: Dict) -> Self {
        Value::Dict(dict)
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Dict(_) => Kind::Dict,
        }
    }

    /// The underlying payload. Floats are returned as-is and containers are not converted.
    #[must_use]
    pub fn payload(&self) -> Payload<'_> {
        match self {
            Value::Null => Payload::Null,
            Value::Bool(value) => Payload::Bool(*value),
            Value::Int(value) => Payload::Int(*value),
            Value::Float(value) => Payload::Float(*value),
            Value::String(value) => Payload::String(value),
            Value::List(list) => Payload::List(list),
            Value::Dict(dict) => Payload::Dict(dict),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Look up `key` if this value is a dict.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict().and_then(|dict| dict.get(key))
    }

    /// Look up the element at `idx` if this value is a list.
    #[must_use]
    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.as_list().and_then(|list| list.get(idx))
    }
}

/// Null-safe access to values that may be absent.
///
/// An absent value behaves exactly like [`Value::Null`].
pub trait OptionValueExt<'a> {
    fn or_null(self) -> &'a Value;
    fn payload(self) -> Payload<'a>;
    fn to_generic(self) -> crate::GenericValue;
}

impl<'a> OptionValueExt<'a> for Option<&'a Value> {
    fn or_null(self) -> &'a Value {
        self.unwrap_or(&NULL)
    }

    fn payload(self) -> Payload<'a> {
        self.or_null().payload()
    }

    fn to_generic(self) -> crate::GenericValue {
        self.or_null().to_generic()
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Returns [`Value::Null`] if this is not a dict or the key is missing.
    fn index(&self, key: &str) -> &Value {
        self.get(key).or_null()
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// Returns [`Value::Null`] if this is not a list or the index is out of bounds.
    fn index(&self, idx: usize) -> &Value {
        self.get_index(idx).or_null()
    }
}

macro_rules! impl_from {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

impl_from!(Bool, bool, bool);
impl_from!(Int, i64, i8, i16, i32, i64, u8, u16, u32);
impl_from!(Float, f64, f32, f64);
impl_from!(String, String, &str, String);
impl_from!(List, List, List);
impl_from!(Dict, Dict, Dict);

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Value {
    /// Compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&encoded))
    }
}
