//! Building values from generic input.
use ahash::AHashMap;

use crate::{Dict, Error, GenericValue, List, Text, Value};

/// Maximum nesting of lists and dicts accepted when building, encoding or decoding values.
///
/// Matches the recursion limit of the `serde_json` parser, so every value that can be built
/// can also be decoded from its own encoding.
pub const MAX_DEPTH: usize = 127;

impl Value {
    /// Build a value from generic input.
    ///
    /// | Input                 | Result                                               |
    /// |-----------------------|------------------------------------------------------|
    /// | `None`                | `Null`                                               |
    /// | `Bool`                | `Bool`                                               |
    /// | `Int`                 | `Int`                                                |
    /// | `Uint`                | `Int`, or `Float` above `i64::MAX` (precision loss)  |
    /// | `Float`               | `Float`                                              |
    /// | `String`              | `String`; must be valid UTF-8                        |
    /// | `Bytes`               | `String` holding standard base64                     |
    /// | `Seq`                 | `List`                                               |
    /// | `Map`                 | `Dict`; keys must be valid UTF-8                     |
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEncoding`] for text or keys that are not valid UTF-8;
    /// - [`Error::UnsupportedType`] for opaque host values;
    /// - [`Error::DepthLimitExceeded`] when nesting exceeds [`MAX_DEPTH`].
    pub fn from_generic(value: GenericValue) -> Result<Value, Error> {
        build_value(value, 0)
    }
}

impl TryFrom<GenericValue> for Value {
    type Error = Error;

    fn try_from(value: GenericValue) -> Result<Self, Self::Error> {
        Value::from_generic(value)
    }
}

impl List {
    /// Build a list from generic elements. The first failing element aborts construction.
    ///
    /// # Errors
    ///
    /// See [`Value::from_generic`].
    pub fn from_generic(items: Vec<GenericValue>) -> Result<List, Error> {
        build_list(items, 1)
    }

    /// Build a list of strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEncoding`] if any item is not valid UTF-8.
    pub fn from_strings<I, T>(items: I) -> Result<List, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<Text>,
    {
        items
            .into_iter()
            .map(|item| validate_text(item.into(), false).map(Value::String))
            .collect::<Result<Vec<_>, _>>()
            .map(List::from)
    }

    /// Build a list of lists, one per row.
    ///
    /// # Errors
    ///
    /// See [`Value::from_generic`].
    pub fn from_rows(rows: Vec<Vec<GenericValue>>) -> Result<List, Error> {
        let mut list = List::with_capacity(rows.len());
        for row in rows {
            list.push(build_list(row, 2)?);
        }
        Ok(list)
    }
}

impl Dict {
    /// Build a dict from a generic map. Every key is checked before its value is converted.
    ///
    /// # Errors
    ///
    /// See [`Value::from_generic`].
    pub fn from_generic(entries: AHashMap<Text, GenericValue>) -> Result<Dict, Error> {
        build_dict(entries, 1)
    }
}

fn build_value(value: GenericValue, depth: usize) -> Result<Value, Error> {
    match value {
        GenericValue::None => Ok(Value::Null),
        GenericValue::Bool(value) => Ok(Value::Bool(value)),
        GenericValue::Int(value) => Ok(Value::Int(value)),
        GenericValue::Uint(value) => Ok(match i64::try_from(value) {
            Ok(value) => Value::Int(value),
            // NOTE: Imprecise cast, `f64` has 53 bits of mantissa
            #[allow(clippy::cast_precision_loss)]
            Err(_) => Value::Float(value as f64),
        }),
        GenericValue::Float(value) => Ok(Value::Float(value)),
        GenericValue::String(text) => validate_text(text, false).map(Value::String),
        GenericValue::Bytes(bytes) => Ok(Value::String(data_encoding::BASE64.encode(&bytes))),
        GenericValue::Seq(items) => build_list(items, depth + 1).map(Value::List),
        GenericValue::Map(entries) => build_dict(entries, depth + 1).map(Value::Dict),
        GenericValue::Opaque(type_name) => Err(Error::unsupported_type(type_name)),
    }
}

fn build_list(items: Vec<GenericValue>, depth: usize) -> Result<List, Error> {
    check_depth(depth)?;
    let mut list = List::with_capacity(items.len());
    for item in items {
        list.push(build_value(item, depth)?);
    }
    Ok(list)
}

fn build_dict(entries: AHashMap<Text, GenericValue>, depth: usize) -> Result<Dict, Error> {
    check_depth(depth)?;
    let mut dict = Dict::with_capacity(entries.len());
    for (key, value) in entries {
        let key = validate_text(key, true)?;
        dict.set(key, build_value(value, depth)?);
    }
    Ok(dict)
}

fn check_depth(depth: usize) -> Result<(), Error> {
    if depth > MAX_DEPTH {
        tracing::debug!(limit = MAX_DEPTH, "generic input nested too deeply");
        return Err(Error::depth_limit(MAX_DEPTH));
    }
    Ok(())
}

fn validate_text(text: Text, key: bool) -> Result<String, Error> {
    text.into_string()
        .map_err(|bytes| Error::invalid_encoding(bytes, key))
}
