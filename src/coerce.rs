//! The coercion toolkit.
//!
//! Stateless functions that answer "can this value be read as an integer,
//! decimal, boolean or string?" and convert between representations with a
//! fixed table of textual patterns.
//!
//! Probing never fails: the `is_*` functions return `bool` and the
//! `try_parse_*` / `*_value` functions return `Option`. Only
//! [`convert_native`] and the named-type path of [`str_to_type`] return errors.
//!
//! ## Examples
//!
//! ```rust
//! use typed_value::{coerce, Kind, Value};
//!
//! assert!(coerce::is_integer(&Value::from("10")));
//! assert_eq!(coerce::try_parse_float(&Value::from("14,4"), true), Some(14.4));
//! assert_eq!(coerce::bool_value(&Value::from("yes")), Some(true));
//! assert_eq!(coerce::bool_value(&Value::from("foo")), None);
//!
//! let truncated = coerce::str_to_type("14.4", &Kind::Integer).unwrap();
//! assert_eq!(truncated, Value::from(14));
//! ```

use crate::de::decode;
use crate::ser::encode;
use crate::value::format_float;
use crate::{Array, Error, Kind, Result, Value};
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

/// Up to 12 digits: integer text that fits comfortably in 32-bit-style ranges.
static RX_INT32: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(0|[1-9]\d{0,11})$").expect("integer pattern compiles"));

/// Up to 20 digits.
static RX_INT64: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(0|[1-9]\d{0,19})$").expect("long pattern compiles"));

/// Decimal with a dot separator.
static RX_DECIMAL_DOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?((0|[1-9]\d{0,20})?\.\d{0,14}|\.\d{0,14})$").expect("decimal pattern compiles")
});

/// Decimal with a dot or comma separator.
static RX_DECIMAL_ANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?((0|[1-9]\d{0,20})?(\.|,)\d{0,14}|(\.|,)\d{1,14})$")
        .expect("decimal pattern compiles")
});

// The truthy list carries HTML boolean attribute names, `disabled` included.
static RX_TRUTHY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^([1-9]\d*|t(rue)?|on|yes|ok|enabled|disabled|readonly|autocomplete|autofill|selected)$",
    )
    .expect("truthy pattern compiles")
});

static RX_FALSY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(0|-[1-9]\d*|f(alse)?|off|no|out)$").expect("falsy pattern compiles")
});

static RX_ENCODED_BOOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^b:[01];$").expect("encoded bool pattern compiles"));

/// The plain text cast used by the pattern checks. Values without a textual
/// form (arrays, resources, objects that do not render) yield `None` and
/// never match.
fn loose_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(format_float(*f)),
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.render(),
        Value::Array(_) | Value::DateTime(_) | Value::Resource(_) => None,
    }
}

fn matches_text(value: &Value, pattern: &Regex) -> bool {
    loose_text(value).is_some_and(|text| pattern.is_match(&text))
}

/// Parses text the decimal patterns accepted. A bare separator reads as `0`.
fn parse_decimal(text: &str) -> f64 {
    text.replace(',', ".").parse().unwrap_or(0.0)
}

/// Reads the leading integer part of numeric text, saturating at the `i64`
/// bounds: `"14.4"` and `"14,4"` read as `14`, `".5"` as `0`.
fn leading_integer(text: &str) -> i64 {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut result: i64 = 0;
    for digit in digits {
        let digit = i64::from(digit - b'0');
        result = if negative {
            result.saturating_mul(10).saturating_sub(digit)
        } else {
            result.saturating_mul(10).saturating_add(digit)
        };
    }
    result
}

/// Returns `true` if the value is an integer or its text looks like one.
///
/// This is a textual heuristic: `1.0` and `true` pass (their text is `"1"`),
/// `false` does not (its text is empty), and the digit count is limited to 12.
///
/// ```rust
/// use typed_value::{coerce::is_integer, Value};
///
/// assert!(is_integer(&Value::from(1.0)));
/// assert!(!is_integer(&Value::from("a")));
/// assert!(!is_integer(&Value::from(false)));
/// ```
#[must_use]
pub fn is_integer(value: &Value) -> bool {
    matches!(value, Value::Integer(_)) || matches_text(value, &RX_INT32)
}

/// Converts to an integer where the conversion is exact by type: integers,
/// floats inside the `i64` range (truncated) and booleans. Other values are
/// read through [`string_value`] and must match the integer pattern.
///
/// ```rust
/// use typed_value::{coerce::try_parse_integer, Value};
///
/// assert_eq!(try_parse_integer(&Value::from(14.51)), Some(14));
/// assert_eq!(try_parse_integer(&Value::from("12345")), Some(12345));
/// assert_eq!(try_parse_integer(&Value::from(1e300)), None);
/// ```
#[must_use]
pub fn try_parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Float(f) => {
            if f.is_nan() || *f >= i64::MAX as f64 || *f < i64::MIN as f64 {
                None
            } else {
                Some(*f as i64)
            }
        }
        Value::Bool(b) => Some(i64::from(*b)),
        other => {
            let text = string_value(other)?;
            if RX_INT32.is_match(&text) {
                text.parse().ok()
            } else {
                None
            }
        }
    }
}

/// Returns `true` for numbers and for text shaped like a decimal. With
/// `culture_invariant` a comma is accepted as the separator too.
#[must_use]
pub fn is_decimal(value: &Value, culture_invariant: bool) -> bool {
    if matches!(value, Value::Float(_) | Value::Integer(_)) {
        return true;
    }
    let Some(text) = loose_text(value) else {
        return false;
    };
    if RX_INT64.is_match(&text) {
        return true;
    }
    if culture_invariant {
        RX_DECIMAL_ANY.is_match(&text)
    } else {
        RX_DECIMAL_DOT.is_match(&text)
    }
}

/// Converts to a float. Mirrors [`try_parse_integer`], accepting decimal text;
/// with `culture_invariant` the comma separator is normalized to a dot.
#[must_use]
pub fn try_parse_float(value: &Value, culture_invariant: bool) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        other => {
            let text = string_value(other)?;
            if RX_INT64.is_match(&text) {
                return text.parse().ok();
            }
            let pattern: &Regex = if culture_invariant {
                &RX_DECIMAL_ANY
            } else {
                &RX_DECIMAL_DOT
            };
            pattern.is_match(&text).then(|| parse_decimal(&text))
        }
    }
}

/// Interprets a value as a boolean, or returns `None` if it has no boolean reading.
///
/// The checks run in order:
///
/// 1. null has no boolean reading
/// 2. booleans pass through
/// 3. a live resource handle is `true`
/// 4. structured values are read through their string form
/// 5. arrays are `true` when non-empty
/// 6. integer and decimal text is `true` when greater than zero
/// 7. token text: `t`, `true`, `on`, `yes`, `ok` and some HTML boolean
///    attribute names are `true`; `f`, `false`, `off`, `no`, `out` and negative
///    integers are `false`; `b:0;` and `b:1;` are encoded booleans; the empty
///    string is `false`
///
/// ```rust
/// use typed_value::{coerce::bool_value, value, Value};
///
/// assert_eq!(bool_value(&Value::from("")), Some(false));
/// assert_eq!(bool_value(&Value::from("Off")), Some(false));
/// assert_eq!(bool_value(&Value::from(14.4)), Some(true));
/// assert_eq!(bool_value(&value!([0, 1])), Some(true));
/// assert_eq!(bool_value(&Value::Null), None);
/// ```
#[must_use]
pub fn bool_value(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Resource(res) if !res.is_closed() => Some(true),
        Value::Resource(_) => None,
        Value::Object(_) | Value::DateTime(_) => {
            let text = string_value(value)?;
            bool_value(&Value::String(text))
        }
        Value::Array(arr) => Some(!arr.is_empty()),
        Value::Integer(i) => Some(*i > 0),
        Value::Float(f) => Some(*f > 0.0),
        Value::String(s) => bool_from_text(s),
    }
}

fn bool_from_text(text: &str) -> Option<bool> {
    if RX_INT32.is_match(text) {
        return Some(leading_integer(text) > 0);
    }
    if RX_INT64.is_match(text) || RX_DECIMAL_DOT.is_match(text) {
        return Some(parse_decimal(text) > 0.0);
    }
    if RX_TRUTHY.is_match(text) {
        return Some(true);
    }
    if RX_FALSY.is_match(text) {
        return Some(false);
    }
    if RX_ENCODED_BOOL.is_match(text) {
        return Some(text == "b:1;");
    }
    if text.is_empty() {
        return Some(false);
    }
    trace!("no boolean reading for {:?}", text);
    None
}

/// Returns the canonical string form of a value, or `None` if it has none.
///
/// Null is the empty string, booleans are `"true"`/`"false"`, numbers are
/// their decimal text, arrays are their tagged encoding and date/times are
/// `YYYY-MM-DD HH:MM:SS`. Other structured values need a custom rendering;
/// resources never have a string form.
///
/// ```rust
/// use typed_value::{coerce::string_value, value, Value};
///
/// assert_eq!(string_value(&Value::from(false)).as_deref(), Some("false"));
/// assert_eq!(string_value(&Value::from(12.3)).as_deref(), Some("12.3"));
/// assert_eq!(string_value(&value!(["foo"])).as_deref(), Some(r#"a:1:{i:0;s:3:"foo";}"#));
/// ```
#[must_use]
pub fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Resource(_) => None,
        Value::Object(obj) => obj.render(),
        Value::DateTime(dt) => Some(dt.format(Value::DATE_TIME_FORMAT).to_string()),
        Value::Array(_) => Some(encode(value)),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(format_float(*f)),
    }
}

/// Converts text into a value of the requested kind.
///
/// - `Boolean`: [`bool_value`], `false` when there is no boolean reading
/// - `Float`: decimal text (either separator); `0.0` for empty text, null otherwise
/// - `Integer`: integer or decimal text, truncated; `0` for empty text, null otherwise
/// - `String`: the text itself
/// - `Array`: empty text is an empty array; an array encoding (`a:...`) or JSON
///   array/object text is decoded; anything else becomes a one-element array
/// - any other kind: the text must be the encoding of a structured value whose
///   type name equals the kind's name, otherwise the result is null
///
/// # Errors
///
/// The named-type path returns a [`Error::Decode`] when text that announces
/// an encoding of the requested type does not decode.
///
/// ```rust
/// use typed_value::{coerce::str_to_type, value, Kind, Value};
///
/// assert_eq!(str_to_type("", &Kind::Integer).unwrap(), Value::from(0));
/// assert_eq!(str_to_type("blub", &Kind::Integer).unwrap(), Value::Null);
/// assert_eq!(str_to_type("[1,2]", &Kind::Array).unwrap(), value!([1, 2]));
/// assert_eq!(str_to_type("a:bc-def", &Kind::Array).unwrap(), value!(["a:bc-def"]));
/// ```
pub fn str_to_type(text: &str, kind: &Kind) -> Result<Value> {
    let value = Value::from(text);
    match kind {
        Kind::Boolean => Ok(Value::Bool(bool_value(&value).unwrap_or(false))),
        Kind::Float => {
            if is_decimal(&value, true) {
                Ok(Value::Float(parse_decimal(text)))
            } else if text.is_empty() {
                Ok(Value::Float(0.0))
            } else {
                Ok(Value::Null)
            }
        }
        Kind::Integer => {
            if is_integer(&value) || is_decimal(&value, true) {
                Ok(Value::Integer(leading_integer(text)))
            } else if text.is_empty() {
                Ok(Value::Integer(0))
            } else {
                Ok(Value::Null)
            }
        }
        Kind::String => Ok(value),
        Kind::Array => Ok(Value::Array(str_to_array(text))),
        other => str_to_named(text, other.name()),
    }
}

fn str_to_array(text: &str) -> Array {
    if text.is_empty() {
        return Array::new();
    }
    if text.len() > 3 {
        if text.starts_with("a:") {
            match decode(text) {
                Ok(Value::Array(arr)) => return arr,
                Ok(other) => debug!("array encoding decoded to {} instead", other.kind()),
                Err(err) => debug!("array encoding did not decode: {}", err),
            }
        }
        let json_shaped = (text.starts_with('[') && text.ends_with(']'))
            || (text.starts_with('{') && text.ends_with('}'));
        if json_shaped {
            match serde_json::from_str::<Value>(text) {
                Ok(Value::Array(arr)) => return arr,
                Ok(_) => {}
                Err(err) => debug!("JSON-shaped text did not decode: {}", err),
            }
        }
    }
    vec![Value::from(text)].into()
}

fn str_to_named(text: &str, type_name: &str) -> Result<Value> {
    if text.len() <= 3 || !text.starts_with("O:") {
        return Ok(Value::Null);
    }
    let header = Regex::new(&format!(r#"^O:[^"]+"{}":"#, regex::escape(type_name)))
        .map_err(Error::library)?;
    if !header.is_match(text) {
        return Ok(Value::Null);
    }
    let decoded = decode(text)?;
    if decoded.is_object() && decoded.kind().name() == type_name {
        Ok(decoded)
    } else {
        debug!("encoding decoded to {} instead of {}", decoded.kind(), type_name);
        Ok(Value::Null)
    }
}

/// Returns `true` for booleans, integers, floats, strings and arrays.
#[inline]
#[must_use]
pub fn is_native(value: &Value) -> bool {
    native_kind(value).is_some()
}

/// Returns the kind of a native value, or `None` for null, resources and
/// structured values.
#[must_use]
pub fn native_kind(value: &Value) -> Option<Kind> {
    let kind = Kind::of(value);
    kind.is_native().then_some(kind)
}

/// Returns the kind of any value. See [`Kind::of`].
#[inline]
#[must_use]
pub fn kind_of(value: &Value) -> Kind {
    Kind::of(value)
}

const NOT_NATIVE: &str =
    "Can not convert a value of a type that is not a native type! (bool, int, float, string)";

/// Converts between the native kinds.
///
/// Null converts to null whatever the target. A source already of the target
/// kind is returned as is.
///
/// | from \ to | float | integer | string | boolean |
/// |-----------|-------|---------|--------|---------|
/// | boolean | `1.0`/`0.0` | `1`/`0` | `"1"`/`"0"` | |
/// | float | | truncated | decimal text | `> 0` |
/// | integer | widened | | decimal text | `> 0` |
/// | string | [`str_to_type`] | [`str_to_type`] | | [`str_to_type`] |
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] naming `source_value` when the source is
/// not native, and naming `new_type` for any pairing outside the table.
///
/// ```rust
/// use typed_value::{coerce::convert_native, Kind, Value};
///
/// assert_eq!(convert_native(&Value::from("123"), &Kind::Integer).unwrap(), Value::from(123));
/// assert_eq!(convert_native(&Value::from(-1.4), &Kind::Boolean).unwrap(), Value::from(false));
/// assert!(convert_native(&Value::from(1), &Kind::Array).is_err());
/// ```
pub fn convert_native(source: &Value, target: &Kind) -> Result<Value> {
    if source.is_null() {
        return Ok(Value::Null);
    }
    let source_kind =
        native_kind(source).ok_or_else(|| Error::invalid_argument("source_value", source, NOT_NATIVE))?;
    if source_kind == *target {
        return Ok(source.clone());
    }

    let converted = match (source, target) {
        (Value::Bool(b), Kind::Float) => Some(Value::Float(if *b { 1.0 } else { 0.0 })),
        (Value::Bool(b), Kind::Integer) => Some(Value::Integer(i64::from(*b))),
        (Value::Bool(b), Kind::String) => Some(Value::from(if *b { "1" } else { "0" })),
        (Value::Float(f), Kind::Integer) => Some(Value::Integer(*f as i64)),
        (Value::Float(f), Kind::String) => Some(Value::String(format_float(*f))),
        (Value::Float(f), Kind::Boolean) => Some(Value::Bool(*f > 0.0)),
        (Value::Integer(i), Kind::Float) => Some(Value::Float(*i as f64)),
        (Value::Integer(i), Kind::String) => Some(Value::String(i.to_string())),
        (Value::Integer(i), Kind::Boolean) => Some(Value::Bool(*i > 0)),
        (Value::String(s), Kind::Integer | Kind::Boolean | Kind::Float) => {
            Some(str_to_type(s, target)?)
        }
        _ => None,
    };

    converted.ok_or_else(|| Error::invalid_argument("new_type", &Value::from(target.name()), NOT_NATIVE))
}
