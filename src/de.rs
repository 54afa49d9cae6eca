//! Decoding of the tagged encoding.
//!
//! This module provides the [`Decoder`], a single-pass parser that rebuilds a
//! [`Value`] from its tagged encoding, and [`ValueDeserializer`], which lets any
//! `T: Deserialize` be read out of a [`Value`].
//!
//! Structured values come back as [`Record`]s carrying the encoded type name;
//! the `DateTime` type is rebuilt as [`Value::DateTime`] when its `date`
//! property parses.
//!
//! ```rust
//! use serde::Deserialize;
//! use typed_value::{de::decode, from_str, Value};
//!
//! let value = decode(r#"a:2:{i:0;s:3:"foo";s:3:"bar";d:1.5;}"#).unwrap();
//! let array = value.as_array().unwrap();
//! assert_eq!(array.get(0), Some(&Value::from("foo")));
//! assert_eq!(array.get("bar"), Some(&Value::from(1.5)));
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let point: Point = from_str(r#"O:5:"Point":2:{s:1:"x";i:1;s:1:"y";i:2;}"#).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```

use crate::{Array, Error, Key, Record, Result, Value};
use chrono::NaiveDateTime;
use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Deepest array or object nesting the decoder accepts.
const MAX_DEPTH: usize = 512;

/// Parser for the tagged encoding.
pub struct Decoder<'de> {
    input: &'de str,
    position: usize,
    depth: usize,
}

impl<'de> Decoder<'de> {
    pub fn new(input: &'de str) -> Self {
        Decoder {
            input,
            position: 0,
            depth: 0,
        }
    }

    /// Byte offset of the next unread character.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn eof(&self) -> Error {
        Error::decode(self.input.len(), "unexpected end of input")
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        match self.peek_byte() {
            Some(b) if b == expected => {
                self.position += 1;
                Ok(())
            }
            Some(_) => Err(Error::decode(
                self.position,
                &format!("expected '{}'", expected as char),
            )),
            None => Err(self.eof()),
        }
    }

    /// Reads up to `terminator` and consumes it.
    fn read_until(&mut self, terminator: u8) -> Result<&'de str> {
        let start = self.position;
        let len = self.input.as_bytes()[start..]
            .iter()
            .position(|&b| b == terminator)
            .ok_or_else(|| self.eof())?;
        let token = self
            .input
            .get(start..start + len)
            .ok_or_else(|| Error::decode(start, "invalid token"))?;
        self.position = start + len + 1;
        Ok(token)
    }

    fn parse_length(&mut self) -> Result<usize> {
        let start = self.position;
        self.read_until(b':')?
            .parse()
            .map_err(|_| Error::decode(start, "invalid length"))
    }

    /// Reads `len:"..."` and returns the quoted text.
    fn parse_quoted(&mut self) -> Result<&'de str> {
        let len = self.parse_length()?;
        self.expect(b'"')?;
        let start = self.position;
        let text = start
            .checked_add(len)
            .and_then(|end| self.input.get(start..end))
            .ok_or_else(|| Error::decode(start, "string length out of range"))?;
        self.position = start + len;
        self.expect(b'"')?;
        Ok(text)
    }

    /// Decodes the next value.
    pub fn decode_value(&mut self) -> Result<Value> {
        let start = self.position;
        let tag = self.peek_byte().ok_or_else(|| self.eof())?;
        self.position += 1;
        if tag == b'N' {
            self.expect(b';')?;
            return Ok(Value::Null);
        }
        self.expect(b':')?;

        match tag {
            b'b' => match self.read_until(b';')? {
                "0" => Ok(Value::Bool(false)),
                "1" => Ok(Value::Bool(true)),
                _ => Err(Error::decode(start, "invalid boolean")),
            },
            b'i' => self
                .read_until(b';')?
                .parse()
                .map(Value::Integer)
                .map_err(|_| Error::decode(start, "invalid integer")),
            b'd' => parse_float_token(self.read_until(b';')?)
                .map(Value::Float)
                .ok_or_else(|| Error::decode(start, "invalid float")),
            b's' => {
                let text = self.parse_quoted()?;
                self.expect(b';')?;
                Ok(Value::String(text.to_string()))
            }
            b'a' => self.parse_entries().map(Value::Array),
            b'O' => {
                let type_name = self.parse_quoted()?;
                self.expect(b':')?;
                let properties = self.parse_entries()?;
                build_object(type_name, properties, start)
            }
            _ => Err(Error::decode(start, "unknown type tag")),
        }
    }

    fn parse_entries(&mut self) -> Result<Array> {
        let count = self.parse_length()?;
        self.expect(b'{')?;
        if self.depth >= MAX_DEPTH {
            return Err(Error::decode(self.position, "nesting too deep"));
        }
        self.depth += 1;
        let mut array = Array::with_capacity(count.min(1024));
        for _ in 0..count {
            let key = self.parse_key()?;
            let value = self.decode_value()?;
            array.insert(key, value);
        }
        self.depth -= 1;
        self.expect(b'}')?;
        Ok(array)
    }

    fn parse_key(&mut self) -> Result<Key> {
        let start = self.position;
        match self.peek_byte() {
            Some(b'i') | Some(b's') => match self.decode_value()? {
                Value::Integer(i) => Ok(Key::Index(i)),
                Value::String(s) => Ok(Key::from(s)),
                _ => Err(Error::decode(start, "invalid array key")),
            },
            Some(_) => Err(Error::decode(start, "array keys must be integers or strings")),
            None => Err(self.eof()),
        }
    }
}

fn parse_float_token(token: &str) -> Option<f64> {
    match token {
        "NAN" => Some(f64::NAN),
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        _ => token.parse().ok(),
    }
}

fn build_object(type_name: &str, properties: Array, start: usize) -> Result<Value> {
    if type_name == Value::DATE_TIME_TYPE {
        if let Some(Value::String(date)) = properties.get("date") {
            return parse_date_time(date)
                .map(Value::DateTime)
                .ok_or_else(|| Error::decode(start, "invalid date/time"));
        }
    }
    Ok(Value::from(Record::with_properties(type_name, properties)))
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, Value::DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Decodes a complete tagged encoding.
///
/// # Errors
///
/// Returns [`Error::Decode`] with the byte offset of the first malformed
/// token, or of trailing input after the value.
pub fn decode(input: &str) -> Result<Value> {
    let mut decoder = Decoder::new(input);
    let value = decoder.decode_value()?;
    if !decoder.at_end() {
        return Err(Error::decode(decoder.position(), "trailing characters"));
    }
    Ok(value)
}

/// Deserializes a `T` from its tagged encoding.
///
/// # Errors
///
/// Fails on malformed input or when the decoded value does not fit `T`.
pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    from_value(decode(input)?)
}

/// Deserializes a `T` from a [`Value`].
///
/// # Errors
///
/// Fails when the value does not fit `T`.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(ValueDeserializer::new(value))
}

/// Reads Rust data out of a [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null | Value::Resource(_) => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) if arr.is_list() => {
                visitor.visit_seq(SeqDeserializer::new(arr.into_iter().map(|(_, v)| v).collect()))
            }
            Value::Array(arr) => visitor.visit_map(MapDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj.properties())),
            Value::DateTime(dt) => {
                visitor.visit_string(dt.format(Value::DATE_TIME_FORMAT).to_string())
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Array(arr) if arr.len() == 1 => {
                let (variant, value) = arr
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::custom("Expected enum variant"))?;
                visitor.visit_enum(EnumDeserializer {
                    variant: variant.to_string(),
                    value: Some(value),
                })
            }
            _ => Err(Error::custom("Expected enum")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<Key, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(array: Array) -> Self {
        MapDeserializer {
            iter: array.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key.to_string())))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("Expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(arr)) => {
                visitor.visit_seq(SeqDeserializer::new(arr.into_iter().map(|(_, v)| v).collect()))
            }
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(arr)) => visitor.visit_map(MapDeserializer::new(arr)),
            Some(Value::Object(obj)) => visitor.visit_map(MapDeserializer::new(obj.properties())),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}
