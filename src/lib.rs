//! # typed_value
//!
//! Dynamic values with loose, pattern-driven type coercion.
//!
//! ## What is in here?
//!
//! - [`Value`]: a dynamically typed value (null, bool, integer, float, string,
//!   ordered keyed [`Array`], structured [`Object`], date-time, resource handle)
//! - [`Kind`]: the classification of a value, with structured values tagged by type name
//! - [`coerce`]: stateless probes and conversions ("is this text an integer?",
//!   "read this as a boolean", "turn this text into a float")
//! - [`TypedValue`]: a value classified once, with its canonical string form,
//!   equality by string form and rendering as a source literal
//! - a compact tagged encoding ([`ser::encode`], [`de::decode`]) with Serde support
//! - XML helpers: attribute lists, escaping and typed XML elements
//!
//! ## Quick Start
//!
//! ```rust
//! use typed_value::{coerce, Kind, TypedValue, Value};
//!
//! assert!(coerce::is_integer(&Value::from("42")));
//! assert_eq!(coerce::bool_value(&Value::from("off")), Some(false));
//! assert_eq!(coerce::str_to_type("0,5", &Kind::Float).unwrap(), Value::from(0.5));
//!
//! let typed = TypedValue::new("hello").unwrap();
//! assert_eq!(typed.kind(), &Kind::String);
//! assert_eq!(typed.to_literal(), "'hello'");
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use typed_value::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let encoded = to_string(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(encoded, r#"O:5:"Point":2:{s:1:"x";i:1;s:1:"y";i:2;}"#);
//!
//! let point: Point = from_str(&encoded).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```
//!
//! ### Building values with value!
//!
//! ```rust
//! use typed_value::{value, Value};
//!
//! let data = value!({
//!     "name": "Alice",
//!     "tags": ["rust", "serde"]
//! });
//!
//! let array = data.as_array().unwrap();
//! assert_eq!(array.get("name").and_then(Value::as_str), Some("Alice"));
//! ```
//!
//! ## Logging
//!
//! Fallback paths (text that only looked like an encoding, unreadable
//! booleans, typeless XML elements) are reported through the [`log`] facade
//! at `debug` and `trace` level.

pub mod array;
pub mod attributes;
pub mod coerce;
pub mod de;
pub mod error;
pub mod escape;
pub mod kind;
pub mod macros;
pub mod object;
pub mod options;
pub mod ser;
pub mod typed;
pub mod value;
pub mod xml;

pub use array::{Array, Key};
pub use de::{decode, from_str, from_value, Decoder, ValueDeserializer};
pub use error::{Error, Result};
pub use kind::Kind;
pub use object::{Object, Record, Structured};
pub use options::AttributeOptions;
pub use ser::{encode, to_string, to_value, Encoder, ValueSerializer};
pub use typed::TypedValue;
pub use value::{Resource, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize any `T: Serialize` to a writer in the tagged encoding.
///
/// # Examples
///
/// ```rust
/// use typed_value::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![1, 2]).unwrap();
/// assert_eq!(buffer, b"a:2:{i:0;i:1;i:1;i:2;}");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let encoded = to_string(value)?;
    writer
        .write_all(encoded.as_bytes())
        .map_err(Error::custom)?;
    Ok(())
}

/// Deserialize an instance of type `T` from an I/O stream of tagged encoding.
///
/// # Errors
///
/// Returns an error if reading fails, the input is malformed or the data
/// does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader.read_to_string(&mut string).map_err(Error::custom)?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of tagged encoding.
///
/// # Examples
///
/// ```rust
/// use typed_value::from_slice;
///
/// let words: Vec<String> = from_slice(br#"a:1:{i:0;s:2:"hi";}"#).unwrap();
/// assert_eq!(words, vec!["hi".to_string()]);
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not a valid encoding,
/// or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(Error::custom)?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    #[test]
    fn test_struct_round_trip() {
        let user = User {
            id: 7,
            name: "Ada".to_string(),
            active: true,
            tags: vec!["admin".to_string()],
        };
        let encoded = to_string(&user).unwrap();
        assert!(encoded.starts_with(r#"O:4:"User":4:{"#));
        let back: User = from_str(&encoded).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_writer_and_reader() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), 2.5);
        map.insert("a".to_string(), -1.0);

        let mut buffer = Vec::new();
        to_writer(&mut buffer, &map).unwrap();
        let back: BTreeMap<String, f64> = from_reader(Cursor::new(buffer)).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        let result: Result<Vec<i64>> = from_slice(&[0xff, 0xfe]);
        assert!(matches!(result, Err(Error::Custom(_))));
    }

    #[test]
    fn test_typed_value_through_value() {
        let typed = TypedValue::new(value!([1, 2])).unwrap();
        let value = Value::from(typed.clone());
        assert_eq!(value.kind(), Kind::Named(TypedValue::TYPE_NAME.to_string()));
        assert_eq!(value.as_object().and_then(Object::downcast_ref::<TypedValue>), Some(&typed));
    }
}
