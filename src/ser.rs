//! Serialization into values and into the tagged encoding.
//!
//! Two directions live here:
//!
//! - [`ValueSerializer`] turns any `T: Serialize` into a [`Value`]. Sequences
//!   become list arrays, maps become keyed arrays and structs become
//!   [`Record`]s carrying the struct name as their type.
//! - [`Encoder`] writes a [`Value`] in the tagged encoding: a length-prefixed
//!   text form that keeps every scalar's type, every array key and every
//!   structured value's type name, so [`decode`](crate::de::decode) can rebuild
//!   the value exactly.
//!
//! ## Tagged encoding
//!
//! | Value | Encoding |
//! |-------|----------|
//! | null, resource | `N;` |
//! | bool | `b:1;` |
//! | integer | `i:42;` |
//! | float | `d:0.5;`, `d:NAN;`, `d:INF;`, `d:-INF;` |
//! | string | `s:5:"hello";` (byte length) |
//! | array | `a:2:{i:0;s:1:"a";s:3:"key";b:0;}` |
//! | structured | `O:5:"Point":2:{s:1:"x";i:1;s:1:"y";i:2;}` |
//! | date/time | `O:8:"DateTime":1:{s:4:"date";s:19:"2017-12-24 12:24:36";}` |
//!
//! ```rust
//! use serde::Serialize;
//! use typed_value::{to_string, to_value, Kind};
//!
//! #[derive(Serialize)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let value = to_value(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(value.kind(), Kind::Named("Point".to_string()));
//!
//! let encoded = to_string(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(encoded, r#"O:5:"Point":2:{s:1:"x";i:1;s:1:"y";i:2;}"#);
//! ```

use crate::value::format_float;
use crate::{Array, Error, Key, Record, Result, Value};
use serde::{ser, Serialize};

/// Writes values in the tagged encoding.
pub struct Encoder {
    output: String,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder {
            output: String::with_capacity(64),
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends the encoding of `value`.
    pub fn write_value(&mut self, value: &Value) {
        match value {
            Value::Null | Value::Resource(_) => self.output.push_str("N;"),
            Value::Bool(b) => self.output.push_str(if *b { "b:1;" } else { "b:0;" }),
            Value::Integer(i) => {
                self.output.push_str("i:");
                self.output.push_str(&i.to_string());
                self.output.push(';');
            }
            Value::Float(f) => {
                self.output.push_str("d:");
                self.output.push_str(&format_float(*f));
                self.output.push(';');
            }
            Value::String(s) => self.write_str(s),
            Value::Array(arr) => {
                self.output.push_str("a:");
                self.write_entries(arr);
            }
            Value::Object(obj) => {
                self.write_type_header(obj.type_name());
                self.write_entries(&obj.properties());
            }
            Value::DateTime(dt) => {
                self.write_type_header(Value::DATE_TIME_TYPE);
                self.output.push_str("1:{");
                self.write_str("date");
                self.write_str(&dt.format(Value::DATE_TIME_FORMAT).to_string());
                self.output.push('}');
            }
        }
    }

    fn write_str(&mut self, s: &str) {
        self.output.push_str("s:");
        self.output.push_str(&s.len().to_string());
        self.output.push_str(":\"");
        self.output.push_str(s);
        self.output.push_str("\";");
    }

    fn write_key(&mut self, key: &Key) {
        match key {
            Key::Index(i) => {
                self.output.push_str("i:");
                self.output.push_str(&i.to_string());
                self.output.push(';');
            }
            Key::Name(name) => self.write_str(name),
        }
    }

    fn write_type_header(&mut self, type_name: &str) {
        self.output.push_str("O:");
        self.output.push_str(&type_name.len().to_string());
        self.output.push_str(":\"");
        self.output.push_str(type_name);
        self.output.push_str("\":");
    }

    fn write_entries(&mut self, arr: &Array) {
        self.output.push_str(&arr.len().to_string());
        self.output.push_str(":{");
        for (key, value) in arr {
            self.write_key(key);
            self.write_value(value);
        }
        self.output.push('}');
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the tagged encoding of a value.
///
/// ```rust
/// use typed_value::{ser::encode, value};
///
/// assert_eq!(encode(&value!(["foo"])), r#"a:1:{i:0;s:3:"foo";}"#);
/// assert_eq!(encode(&value!(true)), "b:1;");
/// ```
#[must_use]
pub fn encode(value: &Value) -> String {
    let mut encoder = Encoder::new();
    encoder.write_value(value);
    encoder.into_inner()
}

pub(crate) fn encode_array(arr: &Array) -> String {
    let mut encoder = Encoder::new();
    encoder.output.push_str("a:");
    encoder.write_entries(arr);
    encoder.into_inner()
}

/// Converts Rust data into a [`Value`].
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeArray {
    array: Array,
    current_key: Option<Key>,
}

pub struct SerializeRecord {
    record: Record,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeArray;
    type SerializeStruct = SerializeRecord;
    type SerializeStructVariant = SerializeRecord;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(i) => Ok(Value::Integer(i)),
            Err(_) => Ok(Value::Float(v as f64)),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(v.iter().map(|&b| Value::Integer(b as i64)).collect::<Array>().into())
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        Ok(Value::from(Record::new(name)))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type("newtype variants"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec> {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeArray> {
        Ok(SerializeArray {
            array: Array::new(),
            current_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<SerializeRecord> {
        Ok(SerializeRecord {
            record: Record::new(name),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeRecord> {
        Err(Error::unsupported_type("struct variants"))
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::from(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::from(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::from(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::from(self.vec))
    }
}

impl ser::SerializeMap for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(Key::from(s));
                Ok(())
            }
            Value::Integer(i) => {
                self.current_key = Some(Key::Index(i));
                Ok(())
            }
            _ => Err(Error::custom("Array keys must be strings or integers")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.array.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.array))
    }
}

impl ser::SerializeStruct for SerializeRecord {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.record.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::from(self.record))
    }
}

impl ser::SerializeStructVariant for SerializeRecord {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.record.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::from(self.record))
    }
}

/// Converts any `T: Serialize` into a [`Value`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for enum variants carrying data and
/// [`Error::Custom`] for map keys that are neither strings nor integers.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

/// Serializes any `T: Serialize` into the tagged encoding.
///
/// # Errors
///
/// Fails where [`to_value`] fails.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(encode(&to_value(value)?))
}
