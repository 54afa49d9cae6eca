//! Parsing and rendering of `name="value"` attribute lists.
//!
//! ```rust
//! use typed_value::attributes::{create_attribute_string, parse_attributes};
//! use typed_value::{AttributeOptions, Value};
//!
//! let attrs = parse_attributes(r#"id="main" hidden='off'"#, &AttributeOptions::new()).unwrap();
//! assert_eq!(attrs.get("id"), Some(&Value::from("main")));
//! assert_eq!(attrs.get("hidden"), Some(&Value::Bool(false)));
//!
//! assert_eq!(create_attribute_string(&attrs).unwrap(), r#" id="main" hidden="0""#);
//! ```

use crate::coerce::str_to_type;
use crate::escape::{escape_xml_attribute, unescape_xml};
use crate::value::format_float;
use crate::{Array, AttributeOptions, Error, Key, Kind, Result, Value};
use once_cell::sync::Lazy;
use regex::Regex;

static RX_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[ \r\n\t])(\w+)=(?:'([^']*)'|"([^"]*)")"#)
        .expect("attribute pattern compiles")
});

static RX_BOOLEAN_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(0|1|true|false|yes|no|on|off)$").expect("boolean token pattern compiles")
});

/// HTML attributes whose value repeats their name when set.
static RX_BOOLEAN_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(multiple|selected|enabled|disabled|readonly|checked|required)$")
        .expect("boolean attribute pattern compiles")
});

static RX_ATTRIBUTE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_]").expect("attribute name pattern compiles"));

const UNSUPPORTED_ATTRIBUTE: &str =
    "Unsupported value type! Accepted types are string, bool, int, float, DateTime";

/// Parses an attribute list into a keyed array.
///
/// Values may be single- or double-quoted; an attribute must start the text
/// or follow whitespace. Entities inside values are decoded. With
/// [`AttributeOptions::auto_boolean`], `0 1 true false yes no on off` become
/// booleans, and the boolean HTML attributes (`checked`, `selected`, ...)
/// are `true` when their value repeats their name. Text without any
/// attribute yields an empty array.
///
/// # Errors
///
/// Never fails for attribute text today; the `Result` follows the coercion
/// functions the values pass through.
///
/// ```rust
/// use typed_value::{attributes::parse_attributes, AttributeOptions, Value};
///
/// let attrs = parse_attributes(r#"Foo"BAR">BAZ"#, &AttributeOptions::new()).unwrap();
/// assert!(attrs.is_empty());
///
/// let attrs = parse_attributes(r#" multiple="multiple""#, &AttributeOptions::new()).unwrap();
/// assert_eq!(attrs.get("multiple"), Some(&Value::Bool(true)));
/// ```
pub fn parse_attributes(text: &str, options: &AttributeOptions) -> Result<Array> {
    let mut attributes = Array::new();
    for caps in RX_ATTRIBUTE.captures_iter(text) {
        let name = &caps[1];
        let raw = caps
            .get(3)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        let value = unescape_xml(raw, true);

        let value = if !options.auto_boolean {
            Value::String(value)
        } else if RX_BOOLEAN_TOKEN.is_match(&value) {
            str_to_type(&value, &Kind::Boolean)?
        } else if RX_BOOLEAN_ATTRIBUTE.is_match(name) {
            Value::Bool(name.to_lowercase() == value.to_lowercase())
        } else {
            Value::String(value)
        };

        let key = if options.lower_keys {
            name.to_lowercase()
        } else {
            name.to_string()
        };
        attributes.insert(key, value);
    }
    Ok(attributes)
}

/// Renders a keyed array as an attribute list with a leading space.
///
/// Empty arrays and lists render as `""`. Names that do not start with a
/// letter or underscore get a `_` prefix. Booleans render as `1`/`0`,
/// strings are escaped, date-times use [`Value::DATE_TIME_FORMAT`].
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for values other than strings,
/// booleans, integers, floats and date-times.
///
/// ```rust
/// use typed_value::{attributes::create_attribute_string, value};
///
/// let attrs = value!({"a": 4, "5": "x"});
/// assert_eq!(create_attribute_string(attrs.as_array().unwrap()).unwrap(), r#" a="4" _5="x""#);
///
/// let list = value!([1, 2]);
/// assert_eq!(create_attribute_string(list.as_array().unwrap()).unwrap(), "");
///
/// let nested = value!({"a": [1]});
/// assert!(create_attribute_string(nested.as_array().unwrap()).is_err());
/// ```
pub fn create_attribute_string(attributes: &Array) -> Result<String> {
    if attributes.is_empty() || attributes.is_list() {
        return Ok(String::new());
    }
    let mut out = String::new();
    for (key, value) in attributes {
        let text = match value {
            Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => escape_xml_attribute(s),
            Value::DateTime(dt) => dt.format(Value::DATE_TIME_FORMAT).to_string(),
            other => {
                return Err(Error::invalid_argument(
                    &format!("attributes[{}]", key),
                    other,
                    UNSUPPORTED_ATTRIBUTE,
                ))
            }
        };
        out.push(' ');
        out.push_str(&attribute_name(key));
        out.push_str("=\"");
        out.push_str(&text);
        out.push('"');
    }
    Ok(out)
}

fn attribute_name(key: &Key) -> String {
    let name = key.to_string();
    if RX_ATTRIBUTE_NAME.is_match(&name) {
        name
    } else {
        format!("_{}", name)
    }
}
