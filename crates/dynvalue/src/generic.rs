//! The host-side dynamic value used as the interchange point with code outside the value model.
use core::fmt;
use std::borrow::Borrow;

use ahash::AHashMap;
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

/// A generic dynamic value: scalars, text, bytes, sequences and string-keyed maps.
///
/// Unlike [`Value`](crate::Value), it makes no validity promises: text may contain invalid
/// UTF-8 and [`GenericValue::Opaque`] stands for host objects without a mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GenericValue {
    #[default]
    None,
    Bool(bool),
    /// Any signed integer.
    Int(i64),
    /// Any unsigned integer.
    Uint(u64),
    Float(f64),
    String(Text),
    Bytes(Vec<u8>),
    Seq(Vec<GenericValue>),
    Map(AHashMap<Text, GenericValue>),
    /// A host object, identified by its type name.
    Opaque(&'static str),
}

impl GenericValue {
    /// Build a sequence from anything convertible into generic values.
    pub fn seq<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<GenericValue>,
    {
        GenericValue::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Build a map from key-value pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Text>,
        V: Into<GenericValue>,
    {
        GenericValue::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// An opaque host value of type `T`.
    #[must_use]
    pub fn opaque<T: ?Sized>() -> Self {
        GenericValue::Opaque(std::any::type_name::<T>())
    }

    /// Name of the dynamic type, as used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            GenericValue::None => "none",
            GenericValue::Bool(_) => "bool",
            GenericValue::Int(_) => "int",
            GenericValue::Uint(_) => "uint",
            GenericValue::Float(_) => "float",
            GenericValue::String(_) => "string",
            GenericValue::Bytes(_) => "bytes",
            GenericValue::Seq(_) => "seq",
            GenericValue::Map(_) => "map",
            GenericValue::Opaque(name) => *name,
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, GenericValue::None)
    }
}

/// Text as received from the host. May hold bytes that are not valid UTF-8.
#[derive(Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Text(Vec<u8>);

impl Text {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The text as `&str`, if it is valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Convert into a `String`, handing the bytes back when they are not valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns the original bytes if they are not valid UTF-8.
    pub fn into_string(self) -> Result<String, Vec<u8>> {
        String::from_utf8(self.0).map_err(std::string::FromUtf8Error::into_bytes)
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => fmt::Debug::fmt(text, f),
            None => write!(f, "b\"{}\"", self.0.escape_ascii()),
        }
    }
}

impl Borrow<[u8]> for Text {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text(value.as_bytes().to_vec())
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text(value.into_bytes())
    }
}

impl From<&[u8]> for Text {
    fn from(value: &[u8]) -> Self {
        Text(value.to_vec())
    }
}

impl From<Vec<u8>> for Text {
    fn from(value: Vec<u8>) -> Self {
        Text(value)
    }
}

macro_rules! impl_from {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for GenericValue {
                fn from(value: $source) -> Self {
                    GenericValue::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

impl_from!(Bool, bool, bool);
impl_from!(Int, i64, i8, i16, i32, i64);
impl_from!(Uint, u64, u8, u16, u32, u64);
impl_from!(Float, f64, f32, f64);
impl_from!(String, Text, &str, String, Text);

// `isize` and `usize` are at most 64 bits wide on every supported target
impl From<isize> for GenericValue {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: isize) -> Self {
        GenericValue::Int(value as i64)
    }
}

impl From<usize> for GenericValue {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: usize) -> Self {
        GenericValue::Uint(value as u64)
    }
}

impl From<()> for GenericValue {
    fn from((): ()) -> Self {
        GenericValue::None
    }
}

impl<T: Into<GenericValue>> From<Option<T>> for GenericValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(GenericValue::None, Into::into)
    }
}

impl<T: Into<GenericValue>> From<Vec<T>> for GenericValue {
    fn from(value: Vec<T>) -> Self {
        GenericValue::seq(value)
    }
}

impl FromIterator<GenericValue> for GenericValue {
    fn from_iter<I: IntoIterator<Item = GenericValue>>(iter: I) -> Self {
        GenericValue::Seq(iter.into_iter().collect())
    }
}

/// Non-finite floats have no JSON representation and are written as marker strings.
pub(crate) fn non_finite_marker(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value.is_infinite() {
        Some(if value.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        })
    } else {
        None
    }
}

impl Serialize for GenericValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GenericValue::None => serializer.serialize_unit(),
            GenericValue::Bool(value) => serializer.serialize_bool(*value),
            GenericValue::Int(value) => serializer.serialize_i64(*value),
            GenericValue::Uint(value) => serializer.serialize_u64(*value),
            GenericValue::Float(value) => match non_finite_marker(*value) {
                Some(marker) => serializer.serialize_str(marker),
                None => serializer.serialize_f64(*value),
            },
            GenericValue::String(text) => serializer.serialize_str(text_as_str::<S>(text)?),
            GenericValue::Bytes(bytes) => {
                serializer.serialize_str(&data_encoding::BASE64.encode(bytes))
            }
            GenericValue::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            GenericValue::Map(entries) => {
                let mut sorted = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    sorted.push((text_as_str::<S>(key)?, value));
                }
                sorted.sort_unstable_by(|(left, _), (right, _)| left.cmp(right));
                let mut map = serializer.serialize_map(Some(sorted.len()))?;
                for (key, value) in sorted {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            GenericValue::Opaque(name) => Err(S::Error::custom(format_args!(
                "unsupported type: {name}"
            ))),
        }
    }
}

fn text_as_str<S: Serializer>(text: &Text) -> Result<&str, S::Error> {
    text.as_str().ok_or_else(|| {
        S::Error::custom(format_args!(
            "invalid UTF-8 in string: \"{}\"",
            text.as_bytes().escape_ascii()
        ))
    })
}
