//! Error types for coercion, classification and the tagged encoding.
//!
//! Probing operations (`is_*`, `try_parse_*`, `bool_value`, `string_value`)
//! never fail: they answer with `bool` or `Option`. Only operations asked to do
//! something outside their domain return an [`Error`]:
//!
//! - **Invalid arguments**: [`convert_native`](crate::coerce::convert_native)
//!   with a non-native source or an unsupported target kind, and
//!   [`create_attribute_string`](crate::attributes::create_attribute_string)
//!   with a value it cannot render
//! - **Library errors**: broken invariants such as wrapping a
//!   [`TypedValue`](crate::TypedValue) inside another one
//! - **Decode errors**: malformed tagged encodings, with the byte offset
//!
//! ## Examples
//!
//! ```rust
//! use typed_value::{coerce, Error, Kind, Value};
//!
//! let err = coerce::convert_native(&Value::from(false), &Kind::Array).unwrap_err();
//! assert!(matches!(err, Error::InvalidArgument { .. }));
//! assert!(err.to_string().contains("$new_type"));
//! ```

use crate::Value;
use std::fmt;
use thiserror::Error;

/// Longest string value quoted verbatim in an argument error message.
const MAX_QUOTED_LEN: usize = 128;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// An argument holds a value the operation does not accept.
    #[error("Argument ${name} is invalid! It uses a value of type {value}. {reason}")]
    InvalidArgument {
        name: String,
        value: String,
        reason: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// A library invariant was violated.
    #[error("{0}")]
    Library(String),

    /// Malformed tagged encoding
    #[error("Decode error at byte {offset}: {msg}")]
    Decode { offset: usize, msg: String },

    /// Malformed XML handed to the XML helpers
    #[error("XML error: {0}")]
    Xml(String),

    /// Unsupported type for serialization
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an invalid argument error for the parameter `name` holding `value`.
    ///
    /// The offending value is rendered into a short description
    /// (`string with value (abc)`, `integer with value (5)`, `NULL`, ...).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_value::{Error, Value};
    ///
    /// let err = Error::invalid_argument("limit", &Value::from(-1), "Must be positive!");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Argument $limit is invalid! It uses a value of type integer with value (-1). Must be positive!"
    /// );
    /// ```
    pub fn invalid_argument(name: &str, value: &Value, reason: &str) -> Self {
        Error::InvalidArgument {
            name: name.trim_start_matches('$').to_string(),
            value: describe(value),
            reason: reason.to_string(),
            source: None,
        }
    }

    /// Attaches the error that caused this one. Only argument errors carry a source;
    /// other variants are returned unchanged.
    #[must_use]
    pub fn with_source(self, cause: Error) -> Self {
        match self {
            Error::InvalidArgument {
                name, value, reason, ..
            } => Error::InvalidArgument {
                name,
                value,
                reason,
                source: Some(Box::new(cause)),
            },
            other => other,
        }
    }

    /// Creates a generic library error.
    pub fn library<T: fmt::Display>(msg: T) -> Self {
        Error::Library(msg.to_string())
    }

    /// Creates a decode error at the given byte offset.
    pub fn decode(offset: usize, msg: &str) -> Self {
        Error::Decode {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates an XML error.
    pub fn xml<T: fmt::Display>(msg: T) -> Self {
        Error::Xml(msg.to_string())
    }

    /// Creates an unsupported type error for values that cannot become a [`Value`].
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_value::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Resource(res) => format!("{}-Resource", res.label()),
        Value::String(s) if s.len() > MAX_QUOTED_LEN => {
            let mut end = MAX_QUOTED_LEN - 2;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            format!("string with value ({}…)", &s[..end])
        }
        Value::String(s) => format!("string with value ({})", s),
        Value::Bool(b) => format!("boolean with value ({})", b),
        Value::Integer(i) => format!("integer with value ({})", i),
        Value::Float(_) => format!("float with value ({})", value),
        Value::Array(_) => format!(
            "Array: {}",
            serde_json::to_string(value).unwrap_or_else(|_| "[…]".to_string())
        ),
        Value::Object(obj) => format!("{} object", obj.type_name()),
        Value::DateTime(dt) => format!("DateTime object ({})", dt.format("%Y-%m-%d %H:%M:%S")),
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
