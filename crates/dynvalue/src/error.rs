use core::fmt;
use std::{borrow::Cow, ops::Range};

/// Errors produced while building a [`Value`](crate::Value) from generic input or JSON text.
#[derive(Debug)]
pub enum Error {
    /// Text or a map key is not valid UTF-8.
    InvalidEncoding {
        /// The offending bytes.
        bytes: Vec<u8>,
        /// Whether the bytes were used as a dictionary key.
        key: bool,
    },
    /// A generic value has no mapping into the value model.
    UnsupportedType { type_name: Cow<'static, str> },
    /// JSON text is syntactically invalid or truncated.
    MalformedJson(Box<MalformedJson>),
    /// JSON input is empty or contains only whitespace.
    UnexpectedEnd,
    /// Input nesting is deeper than the configured limit.
    DepthLimitExceeded { limit: usize },
    /// A generic tree could not be written as JSON.
    Encode(serde_json::Error),
}

/// Location details of a JSON syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedJson {
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// Byte range of the input the parser stopped at.
    pub span: Range<usize>,
    /// Input bytes surrounding `span`, escaped for display.
    pub excerpt: String,
}

/// Discriminant of [`Error`], convenient for matching without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidEncoding,
    UnsupportedType,
    MalformedJson,
    UnexpectedEnd,
    DepthLimitExceeded,
    Encode,
}

impl Error {
    pub(crate) fn invalid_encoding(bytes: impl Into<Vec<u8>>, key: bool) -> Self {
        Error::InvalidEncoding {
            bytes: bytes.into(),
            key,
        }
    }

    pub(crate) fn unsupported_type(type_name: impl Into<Cow<'static, str>>) -> Self {
        Error::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    pub(crate) fn depth_limit(limit: usize) -> Self {
        Error::DepthLimitExceeded { limit }
    }

    /// Build a syntax error from a `serde_json` error position within `input`.
    pub(crate) fn malformed(input: &[u8], error: &serde_json::Error) -> Self {
        let start = byte_offset(input, error.line(), error.column());
        let end = (start + 1).min(input.len());
        let excerpt_start = start.saturating_sub(EXCERPT_RADIUS);
        let excerpt_end = (end + EXCERPT_RADIUS).min(input.len());
        Error::MalformedJson(Box::new(MalformedJson {
            message: error.to_string(),
            line: error.line(),
            column: error.column(),
            span: start..end,
            excerpt: input[excerpt_start..excerpt_end].escape_ascii().to_string(),
        }))
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidEncoding { .. } => ErrorKind::InvalidEncoding,
            Error::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Error::MalformedJson(_) => ErrorKind::MalformedJson,
            Error::UnexpectedEnd => ErrorKind::UnexpectedEnd,
            Error::DepthLimitExceeded { .. } => ErrorKind::DepthLimitExceeded,
            Error::Encode(_) => ErrorKind::Encode,
        }
    }
}

const EXCERPT_RADIUS: usize = 16;

/// Convert a 1-based line and a byte column, as reported by `serde_json`, into an offset.
///
/// A column of zero points before the first byte of the line.
fn byte_offset(input: &[u8], line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        input
            .iter()
            .enumerate()
            .filter(|(_, byte)| **byte == b'\n')
            .nth(line - 2)
            .map_or(input.len(), |(idx, _)| idx + 1)
    };
    (line_start + column.saturating_sub(1)).min(input.len())
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidEncoding { bytes, key } => {
                let what = if *key { "key" } else { "string" };
                write!(f, "invalid UTF-8 in {what}: \"{}\"", bytes.escape_ascii())
            }
            Error::UnsupportedType { type_name } => write!(f, "unsupported type: {type_name}"),
            Error::MalformedJson(details) => write!(
                f,
                "malformed JSON at line {}, column {} (bytes {}..{}, near \"{}\"): {}",
                details.line,
                details.column,
                details.span.start,
                details.span.end,
                details.excerpt,
                details.message
            ),
            Error::UnexpectedEnd => f.write_str("unexpected end of JSON input"),
            Error::DepthLimitExceeded { limit } => {
                write!(f, "nesting depth exceeds the limit of {limit}")
            }
            Error::Encode(error) => write!(f, "failed to encode JSON: {error}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Encode(error) => Some(error),
            _ => None,
        }
    }
}
