//! JSON text encoding and decoding.
//!
//! Encoding goes through the generic tree, so non-finite floats are written as the strings
//! `"NaN"`, `"Infinity"` and `"-Infinity"`. Decoding parses straight into values and does not
//! recognize those strings: they stay strings.
use std::borrow::Cow;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::{Dict, Error, GenericValue, List, Value, MAX_DEPTH};

/// Options controlling JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    indent: String,
}

impl EncodeOptions {
    /// Create options producing compact, single-line output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-print the output using `indent` for each nesting level.
    ///
    /// An empty string keeps the output compact.
    #[must_use]
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    #[must_use]
    pub fn indent_unit(&self) -> &str {
        &self.indent
    }

    #[must_use]
    pub fn is_pretty(&self) -> bool {
        !self.indent.is_empty()
    }
}

macro_rules! impl_codec {
    ($ty:ident, $what:literal) => {
        impl $ty {
            #[doc = concat!("Encode ", $what, " as compact JSON.")]
            ///
            /// # Errors
            ///
            /// Returns [`Error::DepthLimitExceeded`] if it is nested deeper than [`MAX_DEPTH`],
            /// which only values assembled by hand can be.
            pub fn to_json(&self) -> Result<Vec<u8>, Error> {
                to_vec(&self.to_generic(), &EncodeOptions::default())
            }

            #[doc = concat!("Encode ", $what, " as JSON using `options`.")]
            ///
            /// # Errors
            ///
            /// See [`Self::to_json`].
            pub fn to_json_with(&self, options: &EncodeOptions) -> Result<Vec<u8>, Error> {
                to_vec(&self.to_generic(), options)
            }

            #[doc = concat!("Decode ", $what, " from JSON text.")]
            ///
            /// # Errors
            ///
            /// - [`Error::UnexpectedEnd`] if the input is empty or whitespace only;
            /// - [`Error::MalformedJson`] if it is not valid JSON of the expected shape;
            /// - [`Error::DepthLimitExceeded`] if it is nested too deeply.
            pub fn from_json(input: impl AsRef<[u8]>) -> Result<Self, Error> {
                decode(input.as_ref())
            }
        }
    };
}

impl_codec!(Value, "a value");
impl_codec!(List, "a list");
impl_codec!(Dict, "a dict");

/// Encode a generic tree as JSON.
///
/// # Errors
///
/// - [`Error::DepthLimitExceeded`] if the tree is nested deeper than [`MAX_DEPTH`];
/// - [`Error::Encode`] if it holds text that is not valid UTF-8 or opaque values.
pub fn to_vec(tree: &GenericValue, options: &EncodeOptions) -> Result<Vec<u8>, Error> {
    if !within_depth(tree, MAX_DEPTH) {
        tracing::debug!(limit = MAX_DEPTH, "value nested too deeply to encode");
        return Err(Error::depth_limit(MAX_DEPTH));
    }
    if options.is_pretty() {
        match to_vec_pretty(tree, options.indent_unit().as_bytes()) {
            Ok(output) => return Ok(output),
            Err(error) => {
                tracing::debug!(%error, "failed to indent JSON, falling back to compact output");
            }
        }
    }
    serde_json::to_vec(tree).map_err(Error::Encode)
}

fn to_vec_pretty(tree: &GenericValue, indent: &[u8]) -> Result<Vec<u8>, serde_json::Error> {
    let mut output = Vec::with_capacity(128);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut output, PrettyFormatter::with_indent(indent));
    tree.serialize(&mut serializer)?;
    Ok(output)
}

fn within_depth(tree: &GenericValue, remaining: usize) -> bool {
    match tree {
        GenericValue::Seq(items) => {
            remaining > 0 && items.iter().all(|item| within_depth(item, remaining - 1))
        }
        GenericValue::Map(entries) => {
            remaining > 0
                && entries
                    .values()
                    .all(|value| within_depth(value, remaining - 1))
        }
        _ => true,
    }
}

fn decode<T: DeserializeOwned>(input: &[u8]) -> Result<T, Error> {
    tracing::trace!(len = input.len(), "decoding JSON");
    if input
        .iter()
        .all(|byte| matches!(byte, b' ' | b'\t' | b'\n' | b'\r'))
    {
        return Err(Error::UnexpectedEnd);
    }
    serde_json::from_slice(&unsign_zeros(input)).map_err(|error| {
        if is_recursion_limit(&error) {
            tracing::debug!(limit = MAX_DEPTH, "JSON input nested too deeply");
            Error::depth_limit(MAX_DEPTH)
        } else {
            tracing::debug!(
                line = error.line(),
                column = error.column(),
                %error,
                "malformed JSON input"
            );
            Error::malformed(input, &error)
        }
    })
}

/// Replace the sign of every integer `-0` token with a space.
///
/// `serde_json` reports `-0` as the float `-0.0`, while it is an integer literal and has to
/// decode as `Int(0)`. Byte offsets are preserved, so error positions still match the input.
fn unsign_zeros(input: &[u8]) -> Cow<'_, [u8]> {
    let mut output: Option<Vec<u8>> = None;
    let mut in_string = false;
    let mut escaped = false;
    // A value may start here: at the beginning, or after `[`, `,` or `:`
    let mut value_start = true;
    for (idx, &byte) in input.iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b' ' | b'\t' | b'\n' | b'\r' => {}
            b'[' | b',' | b':' => value_start = true,
            b'-' if value_start
                && input.get(idx + 1) == Some(&b'0')
                && !matches!(
                    input.get(idx + 2),
                    Some(b'0'..=b'9' | b'.' | b'e' | b'E')
                ) =>
            {
                output.get_or_insert_with(|| input.to_vec())[idx] = b' ';
                value_start = false;
            }
            b'"' => {
                in_string = true;
                value_start = false;
            }
            _ => value_start = false,
        }
    }
    output.map_or(Cow::Borrowed(input), Cow::Owned)
}

// `serde_json` reports its recursion limit as a syntax error, only the message tells it apart.
fn is_recursion_limit(error: &serde_json::Error) -> bool {
    error.is_syntax() && error.to_string().starts_with("recursion limit exceeded")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(b"123", Value::Int(123); "integer")]
    #[test_case(b"-9223372036854775808", Value::Int(i64::MIN); "i64 min")]
    #[test_case(b"123.0", Value::Float(123.0); "fraction")]
    #[test_case(b"1e2", Value::Float(100.0); "exponent")]
    #[test_case(b"9223372036854775808", Value::Float(9_223_372_036_854_775_808.0); "above i64 max")]
    #[test_case(b"-9223372036854775809", Value::Float(-9_223_372_036_854_775_808.0); "below i64 min")]
    #[test_case(b"123456789012345678901234", Value::Float(1.234_567_890_123_456_8e23); "beyond u64")]
    #[test_case(b"-0", Value::Int(0); "negative zero integer")]
    #[test_case(b"-0.0", Value::Float(-0.0); "negative zero float")]
    #[test_case(b"-0e0", Value::Float(-0.0); "negative zero exponent")]
    #[test_case(b"  null\n", Value::Null; "null with whitespace")]
    #[test_case(b"true", Value::Bool(true); "true")]
    #[test_case(b"false", Value::Bool(false); "false")]
    #[test_case(b"\"a\\u00e9\\n\"", Value::String("a\u{e9}\n".into()); "string escapes")]
    #[test_case(br#""NaN""#, Value::String("NaN".into()); "nan marker stays a string")]
    fn decode_scalars(input: &[u8], expected: Value) {
        assert_eq!(Value::from_json(input).expect("Valid JSON"), expected);
    }

    #[test]
    fn decode_containers() {
        let value = Value::from_json(br#"{"a": [1, 2.5, "x"], "b": {"c": null}, "a2": []}"#)
            .expect("Valid JSON");
        assert_eq!(value["a"][0], Value::Int(1));
        assert_eq!(value["a"][1], Value::Float(2.5));
        assert_eq!(value["b"].get("c"), Some(&Value::Null));
        assert_eq!(value["a2"], Value::List(List::new()));
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let dict = Dict::from_json(br#"{"a": 1, "a": 2}"#).expect("Valid JSON");
        assert_eq!(dict.get("a"), Some(&Value::Int(2)));
        assert_eq!(dict.len(), 1);
    }

    #[test_case(b""; "empty")]
    #[test_case(b" \t\r\n"; "whitespace")]
    fn unexpected_end(input: &[u8]) {
        let error = Value::from_json(input).expect_err("Empty input");
        assert_eq!(error.kind(), ErrorKind::UnexpectedEnd);
    }

    #[test_case(b"{"; "truncated object")]
    #[test_case(b"[1, 2"; "truncated array")]
    #[test_case(br#"{"a":}"#; "missing value")]
    #[test_case(b"nul"; "bad literal")]
    #[test_case(b"1.2.3"; "bad number")]
    #[test_case(b"123 456"; "trailing characters")]
    #[test_case(b"[\"\xff\"]"; "invalid utf-8")]
    fn malformed(input: &[u8]) {
        let error = Value::from_json(input).expect_err("Malformed input");
        assert_eq!(error.kind(), ErrorKind::MalformedJson);
    }

    #[test]
    fn malformed_reports_span() {
        let input = b"[1, ?]";
        let error = Value::from_json(input).expect_err("Malformed input");
        let Error::MalformedJson(details) = &error else {
            panic!("Unexpected error: {error:?}");
        };
        assert_eq!(&input[details.span.clone()], b"?");
    }

    #[test]
    fn container_shape_is_checked() {
        assert!(List::from_json(b"[1]").is_ok());
        assert_eq!(
            List::from_json(b"{}").expect_err("Not an array").kind(),
            ErrorKind::MalformedJson
        );
        assert_eq!(
            Dict::from_json(b"[]").expect_err("Not an object").kind(),
            ErrorKind::MalformedJson
        );
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let depth = 200;
        let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let error = Value::from_json(input).expect_err("Too deep");
        assert_eq!(error.kind(), ErrorKind::DepthLimitExceeded);
    }

    #[test]
    fn compact_by_default() {
        let value = Value::from(json!({"b": [1, 2], "a": 1}));
        assert_eq!(
            value.to_json().expect("Encodable"),
            br#"{"a":1,"b":[1,2]}"#.to_vec()
        );
    }

    #[test]
    fn indented() {
        let value = Value::from(json!({"a": 1, "b": [1, 2]}));
        let encoded = value
            .to_json_with(&EncodeOptions::new().indent("  "))
            .expect("Encodable");
        assert_eq!(
            String::from_utf8(encoded).expect("Valid UTF-8"),
            "{\n  \"a\": 1,\n  \"b\": [\n    1,\n    2\n  ]\n}"
        );
    }

    #[test]
    fn custom_indent_unit() {
        let value = Value::from(json!([true]));
        let encoded = value
            .to_json_with(&EncodeOptions::new().indent("\t"))
            .expect("Encodable");
        assert_eq!(encoded, b"[\n\ttrue\n]".to_vec());
    }

    #[test]
    fn negative_zero_tokens() {
        let value = Value::from_json(br#"{"-0": [-0, -0.5, "-0", "\"-0"], "b":-0}"#)
            .expect("Valid JSON");
        let Value::List(items) = &value["-0"] else {
            panic!("Unexpected value: {value:?}");
        };
        assert!(matches!(
            items.as_slice(),
            [Value::Int(0), Value::Float(_), Value::String(a), Value::String(b)]
                if a == "-0" && b == "\"-0"
        ));
        assert!(matches!(value["b"], Value::Int(0)));
    }

    #[test_case(b"-01"; "leading zero")]
    #[test_case(b"[1 -0]"; "missing comma")]
    fn negative_zero_keeps_errors(input: &[u8]) {
        let error = Value::from_json(input).expect_err("Malformed input");
        assert_eq!(error.kind(), ErrorKind::MalformedJson);
    }

    fn nested(depth: usize) -> Value {
        let mut tree = GenericValue::from(1);
        for _ in 0..depth {
            tree = GenericValue::seq([tree]);
        }
        Value::from_generic(tree).expect("Within the depth limit")
    }

    #[test]
    fn deepest_value_round_trips() {
        let value = nested(MAX_DEPTH);
        let compact = value.to_json().expect("Encodable");
        assert_eq!(Value::from_json(&compact).expect("Valid JSON"), value);

        let pretty = value
            .to_json_with(&EncodeOptions::new().indent("  "))
            .expect("Encodable");
        assert_ne!(pretty, compact);
        let pretty = String::from_utf8(pretty).expect("Valid UTF-8");
        assert_eq!(pretty.lines().count(), 2 * MAX_DEPTH + 1);
        assert!(pretty.lines().any(|line| line == format!("{}1", "  ".repeat(MAX_DEPTH))));
        assert_eq!(Value::from_json(pretty).expect("Valid JSON"), value);
    }

    #[test]
    fn encoding_rejects_values_nested_too_deeply() {
        let value = Value::List(std::iter::once(nested(MAX_DEPTH)).collect());
        for options in [EncodeOptions::new(), EncodeOptions::new().indent("  ")] {
            let error = value.to_json_with(&options).expect_err("Too deep");
            assert_eq!(error.kind(), ErrorKind::DepthLimitExceeded);
        }
    }

    #[test]
    fn pretty_encoding_failure_is_reported_by_compact_fallback() {
        let tree = GenericValue::seq([GenericValue::opaque::<std::fs::File>()]);
        let error = to_vec(&tree, &EncodeOptions::new().indent("  ")).expect_err("Opaque");
        assert_eq!(error.kind(), ErrorKind::Encode);
    }

    #[test_case(f64::NAN, br#""NaN""#; "nan")]
    #[test_case(f64::INFINITY, br#""Infinity""#; "positive infinity")]
    #[test_case(f64::NEG_INFINITY, br#""-Infinity""#; "negative infinity")]
    fn non_finite_floats(value: f64, expected: &[u8]) {
        assert_eq!(Value::Float(value).to_json().expect("Encodable"), expected);
    }

    #[test]
    fn non_finite_floats_do_not_round_trip() {
        let encoded = Value::Float(f64::INFINITY).to_json().expect("Encodable");
        assert_eq!(
            Value::from_json(encoded).expect("Valid JSON"),
            Value::String("Infinity".into())
        );
    }

    #[test]
    fn whole_floats_stay_floats() {
        let encoded = Value::Float(1.0).to_json().expect("Encodable");
        assert_eq!(encoded, b"1.0".to_vec());
        assert_eq!(Value::from_json(encoded).expect("Valid JSON"), Value::Float(1.0));
    }

    #[test]
    fn generic_trees_with_invalid_text_fail_to_encode() {
        let tree = GenericValue::String(vec![0xff].into());
        let error = to_vec(&tree, &EncodeOptions::new()).expect_err("Invalid UTF-8");
        assert_eq!(error.kind(), ErrorKind::Encode);
    }
}
