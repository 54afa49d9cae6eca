//! Structured values.
//!
//! Anything that is not a primitive, an array or a date/time is a structured
//! value: a named type with properties. User types take part by implementing
//! [`Structured`]; [`Record`] is the built-in implementation the decoder and
//! [`to_value`](crate::to_value) produce.
//!
//! A structured value is string convertible only when it renders itself:
//!
//! ```rust
//! use typed_value::{coerce, Array, Structured, Value};
//! use std::any::Any;
//!
//! #[derive(Debug, Clone)]
//! struct Celsius(f64);
//!
//! impl Structured for Celsius {
//!     fn type_name(&self) -> &str {
//!         "Celsius"
//!     }
//!     fn properties(&self) -> Array {
//!         vec![Value::from(self.0)].into()
//!     }
//!     fn render(&self) -> Option<String> {
//!         Some(format!("{}°C", self.0))
//!     }
//!     fn clone_boxed(&self) -> Box<dyn Structured> {
//!         Box::new(self.clone())
//!     }
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! let value = Value::object(Celsius(21.5));
//! assert_eq!(coerce::string_value(&value).as_deref(), Some("21.5°C"));
//! ```

use crate::{Array, Key, Value};
use std::any::Any;
use std::fmt;

/// A structured value with a type name and properties.
pub trait Structured: fmt::Debug + Send + Sync + 'static {
    /// The concrete type name, used as the value's kind.
    fn type_name(&self) -> &str;

    /// The properties that make up the value, used for encoding and equality.
    fn properties(&self) -> Array;

    /// The custom string form, if the type has one.
    fn render(&self) -> Option<String> {
        None
    }

    /// Returns an independent deep copy.
    fn clone_boxed(&self) -> Box<dyn Structured>;

    fn as_any(&self) -> &dyn Any;
}

/// An owned structured value.
#[derive(Debug)]
pub struct Object(Box<dyn Structured>);

impl Object {
    pub fn new<S: Structured>(inner: S) -> Self {
        Object(Box::new(inner))
    }

    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }

    #[must_use]
    pub fn properties(&self) -> Array {
        self.0.properties()
    }

    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.0.render()
    }

    /// Returns the inner value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Structured>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl Clone for Object {
    fn clone(&self) -> Self {
        Object(self.0.clone_boxed())
    }
}

/// Two objects are equal when their type names and properties are equal.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name() && self.properties() == other.properties()
    }
}

impl From<Box<dyn Structured>> for Object {
    fn from(inner: Box<dyn Structured>) -> Self {
        Object(inner)
    }
}

/// A plain structured value: a type name and an ordered property array.
///
/// # Examples
///
/// ```rust
/// use typed_value::{Kind, Record, Value};
///
/// let point = Record::new("Point").with("x", 1).with("y", 2);
/// assert_eq!(point.get("x"), Some(&Value::from(1)));
///
/// let value = Value::from(point);
/// assert_eq!(value.kind(), Kind::Named("Point".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    properties: Array,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Record {
            type_name: type_name.into(),
            properties: Array::new(),
        }
    }

    pub fn with_properties(type_name: impl Into<String>, properties: Array) -> Self {
        Record {
            type_name: type_name.into(),
            properties,
        }
    }

    /// Adds a property, builder style.
    #[must_use]
    pub fn with<K: Into<Key>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.properties.insert(key, value.into());
        self
    }

    pub fn insert<K: Into<Key>>(&mut self, key: K, value: Value) -> Option<Value> {
        self.properties.insert(key, value)
    }

    #[must_use]
    pub fn get<K: Into<Key>>(&self, key: K) -> Option<&Value> {
        self.properties.get(key)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn props(&self) -> &Array {
        &self.properties
    }
}

impl Structured for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn properties(&self) -> Array {
        self.properties.clone()
    }

    fn clone_boxed(&self) -> Box<dyn Structured> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
