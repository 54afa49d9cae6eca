//! Kind tags for runtime values.
//!
//! Every [`Value`] belongs to exactly one [`Kind`]. Structured values are tagged
//! with their concrete type name instead of a fixed tag.
//!
//! ```rust
//! use typed_value::{Kind, Value};
//!
//! assert_eq!(Kind::of(&Value::from(12)), Kind::Integer);
//! assert_eq!(Kind::of(&Value::from(12)).name(), "int");
//! assert_eq!("Boolean".parse::<Kind>().unwrap(), Kind::Boolean);
//! assert_eq!("Point".parse::<Kind>().unwrap(), Kind::Named("Point".to_string()));
//! ```

use crate::Value;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The semantic category of a value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    String,
    Integer,
    Float,
    Boolean,
    Array,
    /// An opaque external handle
    Resource,
    /// A structured value, tagged with its type name
    Named(String),
    Unknown,
}

impl Kind {
    pub const NULL: &'static str = "null";
    pub const STRING: &'static str = "string";
    pub const INTEGER: &'static str = "int";
    pub const FLOAT: &'static str = "float";
    pub const BOOLEAN: &'static str = "bool";
    pub const ARRAY: &'static str = "array";
    pub const RESOURCE: &'static str = "resource";
    pub const UNKNOWN: &'static str = "unknown";

    /// Classifies a value.
    ///
    /// The checks run in a fixed order: null, string, array, structured,
    /// integer, float, boolean, resource. A closed resource handle is no longer
    /// a resource and falls through to [`Kind::Unknown`].
    #[must_use]
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Null => Kind::Null,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(obj) => Kind::Named(obj.type_name().to_string()),
            Value::DateTime(_) => Kind::Named(Value::DATE_TIME_TYPE.to_string()),
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Bool(_) => Kind::Boolean,
            Value::Resource(res) if !res.is_closed() => Kind::Resource,
            Value::Resource(_) => Kind::Unknown,
        }
    }

    /// Returns the canonical name of this kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Kind::Null => Self::NULL,
            Kind::String => Self::STRING,
            Kind::Integer => Self::INTEGER,
            Kind::Float => Self::FLOAT,
            Kind::Boolean => Self::BOOLEAN,
            Kind::Array => Self::ARRAY,
            Kind::Resource => Self::RESOURCE,
            Kind::Named(name) => name,
            Kind::Unknown => Self::UNKNOWN,
        }
    }

    /// Returns `true` for the kinds native conversions operate on:
    /// boolean, integer, float, string and array.
    #[inline]
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(
            self,
            Kind::Boolean | Kind::Integer | Kind::Float | Kind::String | Kind::Array
        )
    }

    /// Returns `true` for kinds whose values are copied trivially.
    #[inline]
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(
            self,
            Kind::Boolean | Kind::Float | Kind::Integer | Kind::Null | Kind::Resource | Kind::String
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a type name. Built-in names and their aliases (`boolean`, `integer`,
/// `double`) match case-insensitively; anything else is a [`Kind::Named`] with
/// the name kept as written.
impl FromStr for Kind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "null" => Kind::Null,
            "string" => Kind::String,
            "int" | "integer" => Kind::Integer,
            "float" | "double" => Kind::Float,
            "bool" | "boolean" => Kind::Boolean,
            "array" => Kind::Array,
            "resource" => Kind::Resource,
            "unknown" => Kind::Unknown,
            _ => Kind::Named(s.to_string()),
        };
        Ok(kind)
    }
}

impl From<&str> for Kind {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Record, Resource};
    use chrono::NaiveDate;

    #[test]
    fn test_classification() {
        assert_eq!(Kind::of(&Value::Null), Kind::Null);
        assert_eq!(Kind::of(&Value::from("x")), Kind::String);
        assert_eq!(Kind::of(&Value::from(1)), Kind::Integer);
        assert_eq!(Kind::of(&Value::from(1.0)), Kind::Float);
        assert_eq!(Kind::of(&Value::from(false)), Kind::Boolean);
        assert_eq!(Kind::of(&Value::from(Vec::<Value>::new())), Kind::Array);
        assert_eq!(Kind::of(&Value::from(Resource::new(3, "stream"))), Kind::Resource);
        assert_eq!(
            Kind::of(&Value::from(Resource::new(3, "stream").closed())),
            Kind::Unknown
        );
        assert_eq!(
            Kind::of(&Value::from(Record::new("Point"))),
            Kind::Named("Point".to_string())
        );
        let dt = NaiveDate::from_ymd_opt(2017, 8, 12)
            .and_then(|d| d.and_hms_opt(14, 23, 0))
            .unwrap();
        assert_eq!(Kind::of(&Value::from(dt)).name(), "DateTime");
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Kind::from("BOOL"), Kind::Boolean);
        assert_eq!(Kind::from("integer"), Kind::Integer);
        assert_eq!(Kind::from("Double"), Kind::Float);
        assert_eq!(Kind::from("DateTime"), Kind::Named("DateTime".to_string()));
    }

    #[test]
    fn test_native_and_primitive() {
        assert!(Kind::Array.is_native());
        assert!(!Kind::Null.is_native());
        assert!(!Kind::Resource.is_native());
        assert!(Kind::Resource.is_primitive());
        assert!(!Kind::Array.is_primitive());
        assert!(!Kind::Named("X".into()).is_primitive());
    }
}
