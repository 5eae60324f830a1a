//! # dynvalue
//!
//! A self-describing dynamic value model for data whose schema is not known ahead of time.
//!
//! [`Value`] is a closed union over null, bool, integer, float, string, [`List`] and [`Dict`].
//! Values are built from a [`GenericValue`] (the host-side dynamic representation) or parsed
//! from JSON text, and convert back into either.
//!
//! ```rust
//! use dynvalue::{EncodeOptions, GenericValue, Value};
//!
//! # fn example() -> Result<(), dynvalue::Error> {
//! let value = Value::from_generic(GenericValue::map([
//!     ("name", GenericValue::from("probe")),
//!     ("size", GenericValue::from(3u8)),
//! ]))?;
//! assert_eq!(value["size"], Value::Int(3));
//!
//! let compact = value.to_json()?;
//! assert_eq!(compact, br#"{"name":"probe","size":3}"#);
//!
//! let pretty = value.to_json_with(&EncodeOptions::new().indent("  "))?;
//! assert_eq!(Value::from_json(&pretty)?, value);
//! # Ok(())
//! # }
//! # example().expect("Example is valid");
//! ```
mod construct;
mod dict;
mod error;
mod extract;
mod generic;
mod impls;
pub mod json;
mod list;
mod value;

pub use construct::MAX_DEPTH;
pub use dict::{Dict, Iter as DictIter};
pub use error::{Error, ErrorKind, MalformedJson};
pub use generic::{GenericValue, Text};
pub use json::EncodeOptions;
pub use list::List;
pub use value::{Kind, OptionValueExt, Payload, Value};
