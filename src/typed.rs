//! A classified value with its canonical string form.
//!
//! [`TypedValue`] wraps a [`Value`], classifies it once into a [`Kind`] and
//! keeps the value's string form when it has one. It compares by string form,
//! renders itself back as a source literal and deep-copies on clone.
//!
//! ```rust
//! use typed_value::{Kind, TypedValue};
//!
//! let answer = TypedValue::new(42).unwrap();
//! assert_eq!(answer.kind(), &Kind::Integer);
//! assert_eq!(answer.string_value(""), "42");
//!
//! // Loose equality compares string forms, strict equality also compares kinds.
//! let text = TypedValue::new("42").unwrap();
//! assert!(answer.equals(&text, false));
//! assert!(!answer.equals(&text, true));
//! ```

use crate::coerce;
use crate::ser::encode;
use crate::{Array, Error, Kind, Result, Structured, Value};
use std::any::Any;
use std::fmt;

/// A value classified into a [`Kind`], with its canonical string form.
#[derive(Debug, Clone)]
pub struct TypedValue {
    value: Value,
    kind: Kind,
    string_value: Option<String>,
}

impl TypedValue {
    /// Type name of a `TypedValue` stored inside a [`Value`].
    pub const TYPE_NAME: &'static str = "TypedValue";

    /// Wraps and classifies a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Library`] if the value already is a `TypedValue`.
    ///
    /// ```rust
    /// use typed_value::{Error, TypedValue, Value};
    ///
    /// let inner = TypedValue::new(1).unwrap();
    /// assert!(matches!(TypedValue::new(Value::from(inner)), Err(Error::Library(_))));
    /// ```
    pub fn new(value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        if as_typed(&value).is_some() {
            return Err(Error::library(
                "Can not create a TypedValue instance of a TypedValue value!",
            ));
        }
        let kind = Kind::of(&value);
        let string_value = coerce::string_value(&value);
        Ok(TypedValue {
            value,
            kind,
            string_value,
        })
    }

    /// Compares with another typed value.
    ///
    /// With `strict`, values of different kinds are never equal. Otherwise,
    /// when `other` has a string form the two string forms are compared
    /// exactly (no case folding); when it has none the raw values are compared.
    #[must_use]
    pub fn equals(&self, other: &TypedValue, strict: bool) -> bool {
        if strict && self.kind != other.kind {
            return false;
        }
        match &other.string_value {
            Some(text) => self.string_value.as_deref() == Some(text.as_str()),
            None => self.value == other.value,
        }
    }

    /// Compares with a raw value, wrapping it first.
    ///
    /// ```rust
    /// use typed_value::{TypedValue, Value};
    ///
    /// let flag = TypedValue::new(true).unwrap();
    /// assert!(flag.equals_value(&Value::from("true"), false));
    /// assert!(!flag.equals_value(&Value::from("True"), false));
    /// ```
    #[must_use]
    pub fn equals_value(&self, other: &Value, strict: bool) -> bool {
        if let Some(typed) = as_typed(other) {
            return self.equals(typed, strict);
        }
        TypedValue::new(other.clone()).is_ok_and(|typed| self.equals(&typed, strict))
    }

    /// Returns the wrapped value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes the wrapper and returns the raw value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Returns the string form, or `default` if the value has none.
    #[must_use]
    pub fn string_value<'a>(&'a self, default: &'a str) -> &'a str {
        self.string_value.as_deref().unwrap_or(default)
    }

    /// Returns `true` if the value has a string form.
    #[inline]
    #[must_use]
    pub fn has_associated_string(&self) -> bool {
        self.string_value.is_some()
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_resource(&self) -> bool {
        self.kind == Kind::Resource
    }

    /// Renders the value as a source literal.
    ///
    /// Booleans render as `true`/`false` and numbers as their text. Strings
    /// with line breaks or tabs become double-quoted literals with escapes,
    /// other strings single-quoted ones. Null, resources and unknown values
    /// render as `null`. Arrays and structured values render as a `decode`
    /// call over their tagged encoding.
    ///
    /// ```rust
    /// use typed_value::{value, TypedValue};
    ///
    /// assert_eq!(TypedValue::new(false).unwrap().to_literal(), "false");
    /// assert_eq!(TypedValue::new("it's").unwrap().to_literal(), r"'it\'s'");
    /// assert_eq!(TypedValue::new("a\tb").unwrap().to_literal(), r#""a\tb""#);
    /// assert_eq!(
    ///     TypedValue::new(value!(["$x"])).unwrap().to_literal(),
    ///     r#"decode("a:1:{i:0;s:2:\"\$x\";}")"#
    /// );
    /// ```
    #[must_use]
    pub fn to_literal(&self) -> String {
        match &self.kind {
            Kind::Boolean => self.value.as_bool().unwrap_or(false).to_string(),
            Kind::Float | Kind::Integer => self.string_value("").to_string(),
            Kind::String => {
                let text = self.string_value("");
                if has_control_chars(text) {
                    format!("\"{}\"", escape_double_quoted(text))
                } else {
                    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
                }
            }
            Kind::Resource | Kind::Null | Kind::Unknown => "null".to_string(),
            Kind::Array | Kind::Named(_) => {
                let encoded = encode(&self.value);
                let escaped = if has_control_chars(&encoded) {
                    escape_double_quoted(&encoded)
                } else {
                    escape_quotes_and_sigil(&encoded)
                };
                format!("decode(\"{}\")", escaped)
            }
        }
    }
}

fn as_typed(value: &Value) -> Option<&TypedValue> {
    value.as_object().and_then(|obj| obj.downcast_ref::<TypedValue>())
}

fn has_control_chars(text: &str) -> bool {
    text.contains(['\r', '\n', '\t'])
}

fn escape_double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_quotes_and_sigil(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            _ => out.push(ch),
        }
    }
    out
}

/// The string form, or nothing.
impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.string_value(""))
    }
}

/// Loose equality, see [`TypedValue::equals`].
impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, false)
    }
}

impl Structured for TypedValue {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn properties(&self) -> Array {
        let mut properties = Array::with_capacity(2);
        properties.insert("value", self.value.clone());
        properties.insert("kind", Value::from(self.kind.name()));
        properties
    }

    fn render(&self) -> Option<String> {
        self.string_value.clone()
    }

    fn clone_boxed(&self) -> Box<dyn Structured> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl From<TypedValue> for Value {
    fn from(value: TypedValue) -> Self {
        Value::object(value)
    }
}
