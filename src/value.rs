//! Dynamic runtime values.
//!
//! This module provides the [`Value`] enum, the one input type every coercion
//! and classification operation works on.
//!
//! ## Core Types
//!
//! - [`Value`]: null, bool, integer, float, string, array, structured value,
//!   date/time or resource handle
//! - [`Resource`]: an opaque external handle the caller owns
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use typed_value::{value, Record, Resource, Value};
//!
//! let null = Value::Null;
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! let handle = Value::from(Resource::new(7, "stream"));
//! let point = Value::from(Record::new("Point").with("x", 1).with("y", 2));
//!
//! // Using the value! macro
//! let list = value!([1, "two", 3.5]);
//! ```
//!
//! ### Inspecting Values
//!
//! ```rust
//! use typed_value::{Kind, Value};
//!
//! let value = Value::from(42);
//! assert!(value.is_integer());
//! assert_eq!(value.kind(), Kind::Integer);
//! assert_eq!(value.as_i64(), Some(42));
//! assert_eq!(value.as_str(), None);
//! ```

use crate::{Array, Key, Kind, Object, Record, Structured};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed runtime value.
///
/// `DateTime` is a structured value with a built-in date/time capability; its
/// kind is `Named("DateTime")`. `Object` holds every other structured value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Array),
    Object(Object),
    DateTime(NaiveDateTime),
    Resource(Resource),
}

/// An opaque handle to an external resource (file, socket, ...).
///
/// The handle is only described here; opening and closing the underlying
/// resource is the caller's business. A handle marked closed is no longer
/// classified as a resource.
///
/// ```rust
/// use typed_value::{Kind, Resource, Value};
///
/// let open = Value::from(Resource::new(5, "stream"));
/// assert_eq!(open.kind(), Kind::Resource);
///
/// let closed = Value::from(Resource::new(5, "stream").closed());
/// assert_eq!(closed.kind(), Kind::Unknown);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Resource {
    id: u64,
    label: String,
    closed: bool,
}

impl Resource {
    pub fn new(id: u64, label: impl Into<String>) -> Self {
        Resource {
            id,
            label: label.into(),
            closed: false,
        }
    }

    /// Marks the handle as closed.
    #[must_use]
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Value {
    /// Type name of date/time values.
    pub const DATE_TIME_TYPE: &'static str = "DateTime";

    /// Text layout of date/time values.
    pub const DATE_TIME_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Wraps a structured value.
    pub fn object<S: Structured>(inner: S) -> Self {
        Value::Object(Object::new(inner))
    }

    /// Returns the kind of this value.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Kind {
        Kind::of(self)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` for structured values, date/times included.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_) | Value::DateTime(_))
    }

    /// Returns `true` for resource handles that are still open.
    #[inline]
    #[must_use]
    pub const fn is_resource(&self) -> bool {
        matches!(self, Value::Resource(res) if !res.closed)
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float, or the integer widened to a float.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Value::Resource(res) => Some(res),
            _ => None,
        }
    }
}

/// Decimal text of a float: shortest round-trip digits, `NAN`, `INF` and `-INF`
/// for the special values.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        f.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => f.write_str(&format_float(*fl)),
            Value::String(s) => f.write_str(s),
            Value::Array(arr) => f.write_str(&crate::ser::encode_array(arr)),
            Value::Object(obj) => match obj.render() {
                Some(text) => f.write_str(&text),
                None => write!(f, "{} object", obj.type_name()),
            },
            Value::DateTime(dt) => write!(f, "{}", dt.format(Value::DATE_TIME_FORMAT)),
            Value::Resource(res) => write!(f, "Resource id #{}", res.id),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null | Value::Resource(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => arr.serialize(serializer),
            Value::Object(obj) => serializer.collect_map(obj.properties().iter()),
            Value::DateTime(dt) => {
                serializer.collect_str(&dt.format(Value::DATE_TIME_FORMAT))
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                match i64::try_from(value) {
                    Ok(i) => Ok(Value::Integer(i)),
                    Err(_) => Ok(Value::Float(value as f64)),
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut array = Array::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    array.push(elem);
                }
                Ok(Value::Array(array))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut array = Array::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    array.insert(Key::from(key), value);
                }
                Ok(Value::Array(array))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value.into())
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Object(Object::new(value))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<Resource> for Value {
    fn from(value: Resource) -> Self {
        Value::Resource(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
