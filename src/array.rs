//! Ordered arrays keyed by integers or names.
//!
//! [`Array`] is the collection value of this crate. It behaves like a list when
//! its keys are `0..n`, and like an ordered dictionary otherwise. It wraps an
//! [`IndexMap`] so iteration always follows insertion order, which keeps the
//! tagged encoding of an array deterministic.
//!
//! Names that are the canonical decimal text of an integer are stored as
//! integer keys, so `"7"` and `7` address the same entry.
//!
//! ## Examples
//!
//! ```rust
//! use typed_value::{Array, Value};
//!
//! let mut array = Array::new();
//! array.push(Value::from("first"));
//! array.insert("name", Value::from("Alice"));
//! array.insert("7", Value::from(7));
//! array.push(Value::from("after seven"));
//!
//! assert_eq!(array.get(7), Some(&Value::from(7)));
//! assert_eq!(array.get(8), Some(&Value::from("after seven")));
//! assert!(!array.is_list());
//! ```

use crate::Value;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// An array key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Index(i64),
    Name(String),
}

impl Key {
    /// Returns the integer key, if this is one.
    #[inline]
    #[must_use]
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Index(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Index(value as i64)
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Key::Index(value as i64)
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        match canonical_index(&value) {
            Some(i) => Key::Index(i),
            None => Key::Name(value),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        match canonical_index(value) {
            Some(i) => Key::Index(i),
            None => Key::Name(value.to_string()),
        }
    }
}

/// `"12"` and `"-3"` are integer keys; `"012"`, `"-0"` and `"+1"` stay names.
fn canonical_index(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let canonical = match digits.as_bytes() {
        [] => false,
        [b'0'] => digits.len() == s.len(),
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    };
    if canonical {
        s.parse().ok()
    } else {
        None
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Key::Index(i) => serializer.serialize_i64(*i),
            Key::Name(name) => serializer.serialize_str(name),
        }
    }
}

/// An ordered map of [`Key`]s to [`Value`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    entries: IndexMap<Key, Value>,
    // One above the largest integer key, if any.
    next_index: Option<i64>,
}

impl Array {
    /// Creates an empty `Array`.
    #[must_use]
    pub fn new() -> Self {
        Array::with_capacity(0)
    }

    /// Creates an empty `Array` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Array {
            entries: IndexMap::with_capacity(capacity),
            next_index: None,
        }
    }

    /// Inserts a key-value pair. An existing key keeps its position and the
    /// old value is returned.
    pub fn insert<K: Into<Key>>(&mut self, key: K, value: Value) -> Option<Value> {
        let key = key.into();
        if let Key::Index(i) = key {
            let next = i.saturating_add(1);
            if self.next_index.map_or(true, |current| next > current) {
                self.next_index = Some(next);
            }
        }
        self.entries.insert(key, value)
    }

    /// Appends a value under the next free integer key (one above the largest
    /// integer key, or `0`).
    pub fn push(&mut self, value: Value) {
        self.insert(Key::Index(self.next_index.unwrap_or(0)), value);
    }

    /// Returns a reference to the value stored under `key`.
    #[must_use]
    pub fn get<K: Into<Key>>(&self, key: K) -> Option<&Value> {
        self.entries.get(&key.into())
    }

    /// Returns the entry at `position` in iteration order.
    #[must_use]
    pub fn get_position(&self, position: usize) -> Option<(&Key, &Value)> {
        self.entries.get_index(position)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the array contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.entries.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Key, Value> {
        self.entries.values()
    }

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.entries.iter()
    }

    /// Returns `true` if the keys are exactly `0, 1, ..., len - 1` in order.
    /// The empty array is a list.
    ///
    /// ```rust
    /// use typed_value::{Array, Value};
    ///
    /// let list: Array = vec![Value::from(0), Value::from("a")].into_iter().collect();
    /// assert!(list.is_list());
    ///
    /// let mut sparse = Array::new();
    /// sparse.insert(2, Value::from(0));
    /// assert!(!sparse.is_list());
    /// ```
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.entries
            .keys()
            .enumerate()
            .all(|(i, key)| *key == Key::Index(i as i64))
    }

    /// Returns the nesting depth: `0` for an empty array, `1` for an array
    /// without nested non-empty arrays, and so on.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.values()
            .filter_map(Value::as_array)
            .map(|nested| 1 + nested.max_depth())
            .fold(1, usize::max)
    }

    /// Returns `true` if the array is non-empty and holds no non-empty nested arrays.
    #[must_use]
    pub fn is_single_depth(&self) -> bool {
        !self.is_empty()
            && self
                .values()
                .filter_map(Value::as_array)
                .all(Array::is_empty)
    }

    /// Inserts `element` at `position`. A negative position inserts at the
    /// front, a position past the end appends. An array element is spliced in
    /// entry by entry.
    ///
    /// ```rust
    /// use typed_value::value;
    ///
    /// let array = value!(["foo", "blub"]);
    /// let spliced = array.as_array().unwrap().insert_at(1, value!(["bar", "baz"]));
    /// assert_eq!(spliced, *value!(["foo", "bar", "baz", "blub"]).as_array().unwrap());
    /// ```
    #[must_use]
    pub fn insert_at(&self, position: i64, element: Value) -> Array {
        let at = clamp_position(position, self.len());
        let head = self.entries.iter().take(at);
        let tail = self.entries.iter().skip(at);
        let middle: Vec<(Key, Value)> = match element {
            Value::Array(inner) => inner.entries.into_iter().collect(),
            other => vec![(Key::Index(0), other)],
        };
        let head = head.map(|(k, v)| (k.clone(), v.clone()));
        let tail = tail.map(|(k, v)| (k.clone(), v.clone()));
        Array::merged(head.chain(middle).chain(tail))
    }

    /// Removes the entry at `position`. Out-of-range positions leave the array unchanged.
    #[must_use]
    pub fn remove_at(&self, position: i64) -> Array {
        if position < 0 || position as usize >= self.len() {
            return self.clone();
        }
        let skip = position as usize;
        Array::merged(
            self.entries
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, (k, v))| (k.clone(), v.clone())),
        )
    }

    /// Removes `length` entries starting at `start`. A negative start begins at
    /// the front; a start past the end leaves the array unchanged. No length
    /// removes everything to the end, a negative length stops that many entries
    /// before the end.
    #[must_use]
    pub fn remove_range(&self, start: i64, length: Option<i64>) -> Array {
        let count = self.len() as i64;
        let start = start.max(0);
        if start >= count {
            return self.clone();
        }
        let length = match length {
            None => count - start,
            Some(len) if len < 0 => (count - start + len).max(0),
            Some(len) => len,
        };
        let end = start.saturating_add(length).min(count);
        Array::merged(
            self.entries
                .iter()
                .enumerate()
                .filter(|(i, _)| (*i as i64) < start || (*i as i64) >= end)
                .map(|(_, (k, v))| (k.clone(), v.clone())),
        )
    }

    /// Returns `length` entries starting at `start`. A negative start counts
    /// from the end, no length takes everything to the end, a negative length
    /// stops that many entries before the end.
    #[must_use]
    pub fn extract(&self, start: i64, length: Option<i64>) -> Array {
        let count = self.len() as i64;
        if count < 1 || start >= count || length == Some(0) {
            return Array::new();
        }
        let start = if start < 0 { (count + start).max(0) } else { start };
        let length = match length {
            None => count - start,
            Some(len) if len < 0 => (count - start + len).max(0),
            Some(len) => len,
        };
        let end = start.saturating_add(length).min(count);
        Array::merged(
            self.entries
                .iter()
                .skip(start as usize)
                .take((end - start).max(0) as usize)
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }

    /// Builds an array from entries, renumbering integer keys from `0` and
    /// keeping names. A repeated name keeps its first position and the last value.
    fn merged<I>(entries: I) -> Array
    where
        I: IntoIterator<Item = (Key, Value)>,
    {
        let mut array = Array::new();
        for (key, value) in entries {
            match key {
                Key::Index(_) => array.push(value),
                name => {
                    array.entries.insert(name, value);
                }
            }
        }
        array
    }
}

fn clamp_position(position: i64, len: usize) -> usize {
    if position < 0 {
        0
    } else {
        (position as usize).min(len)
    }
}

impl Serialize for Array {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.is_list() {
            serializer.collect_seq(self.values())
        } else {
            serializer.collect_map(self.iter())
        }
    }
}

impl IntoIterator for Array {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(Key, Value)> for Array {
    fn from_iter<T: IntoIterator<Item = (Key, Value)>>(iter: T) -> Self {
        let mut array = Array::new();
        for (key, value) in iter {
            array.insert(key, value);
        }
        array
    }
}

/// Collects values into a list keyed `0..n`.
impl FromIterator<Value> for Array {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let mut array = Array::new();
        for value in iter {
            array.push(value);
        }
        array
    }
}

impl From<Vec<Value>> for Array {
    fn from(values: Vec<Value>) -> Self {
        values.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    fn list(items: &[&str]) -> Array {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn test_key_normalization() {
        assert_eq!(Key::from("12"), Key::Index(12));
        assert_eq!(Key::from("-3"), Key::Index(-3));
        assert_eq!(Key::from("0"), Key::Index(0));
        assert_eq!(Key::from("-0"), Key::Name("-0".to_string()));
        assert_eq!(Key::from("012"), Key::Name("012".to_string()));
        assert_eq!(Key::from("1.5"), Key::Name("1.5".to_string()));
        assert_eq!(Key::from(""), Key::Name(String::new()));
        assert_eq!(
            Key::from("99999999999999999999"),
            Key::Name("99999999999999999999".to_string())
        );
    }

    #[test]
    fn test_push_follows_largest_index() {
        let mut array = Array::new();
        array.insert(5, Value::from("five"));
        array.insert("x", Value::from("x"));
        array.push(Value::from("six"));
        assert_eq!(array.get(6), Some(&Value::from("six")));
        assert_eq!(array.len(), 3);
    }

    #[test]
    fn test_push_after_negative_and_lower_keys() {
        let mut array = Array::new();
        array.insert(-3, Value::from("a"));
        array.push(Value::from("b"));
        assert_eq!(array.get(-2), Some(&Value::from("b")));

        array.insert(10, Value::from("c"));
        array.insert(2, Value::from("d"));
        array.push(Value::from("e"));
        assert_eq!(array.get(11), Some(&Value::from("e")));
    }

    #[test]
    fn test_large_list_helpers() {
        let n: i64 = 100_000;
        let big: Array = (0..n).map(Value::from).collect();
        assert!(big.is_list());

        let shifted = big.insert_at(0, Value::from(-1));
        assert_eq!(shifted.len(), n as usize + 1);
        assert!(shifted.is_list());
        assert_eq!(shifted.get(n), Some(&Value::from(n - 1)));

        let tail = big.extract(-2, None);
        assert_eq!(tail, vec![Value::from(n - 2), Value::from(n - 1)].into());
    }

    #[test]
    fn test_is_list() {
        assert!(Array::new().is_list());
        assert!(list(&["0", "a", "2"]).is_list());
        let mut shifted = Array::new();
        shifted.insert(2, Value::from(0));
        shifted.push(Value::from(2));
        assert!(!shifted.is_list());
    }

    #[test]
    fn test_max_depth() {
        assert_eq!(Array::new().max_depth(), 0);
        assert_eq!(value!(["foo", "bar", "baz"]).as_array().unwrap().max_depth(), 1);
        assert_eq!(value!(["foo", "bar", []]).as_array().unwrap().max_depth(), 1);
        assert_eq!(value!(["foo", "bar", ["x"]]).as_array().unwrap().max_depth(), 2);
        assert_eq!(value!(["foo", ["x", []]]).as_array().unwrap().max_depth(), 2);
        assert_eq!(
            value!(["foo", "bar", ["x", ["y", ["z"]]]])
                .as_array()
                .unwrap()
                .max_depth(),
            4
        );
    }

    #[test]
    fn test_is_single_depth() {
        assert!(!Array::new().is_single_depth());
        assert!(value!([[]]).as_array().unwrap().is_single_depth());
        assert!(!value!([["x"]]).as_array().unwrap().is_single_depth());
    }

    #[test]
    fn test_insert_at() {
        let bar = list(&["bar"]);
        assert_eq!(bar.insert_at(0, Value::from("foo")), list(&["foo", "bar"]));
        assert_eq!(bar.insert_at(-1, Value::from("foo")), list(&["foo", "bar"]));
        let foo = list(&["foo"]);
        assert_eq!(foo.insert_at(1, Value::from("bar")), list(&["foo", "bar"]));
        assert_eq!(foo.insert_at(3, Value::from("bar")), list(&["foo", "bar"]));
        assert_eq!(
            foo.insert_at(1, Value::from(list(&["bar", "baz"]))),
            list(&["foo", "bar", "baz"])
        );
        assert_eq!(
            list(&["bar", "baz"]).insert_at(0, Value::from(list(&["foo"]))),
            list(&["foo", "bar", "baz"])
        );
        assert_eq!(
            list(&["foo", "baz"]).insert_at(1, Value::from("bar")),
            list(&["foo", "bar", "baz"])
        );
    }

    #[test]
    fn test_remove_at() {
        let pair = list(&["foo", "bar"]);
        assert_eq!(pair.remove_at(-1), pair);
        assert_eq!(pair.remove_at(5), pair);
        assert_eq!(pair.remove_at(0), list(&["bar"]));
        assert_eq!(pair.remove_at(1), list(&["foo"]));
        assert_eq!(list(&["foo", "bar", "baz"]).remove_at(1), list(&["foo", "baz"]));
    }

    #[test]
    fn test_remove_range() {
        let three = list(&["foo", "bar", "baz"]);
        assert_eq!(three.remove_range(-1, Some(0)), three);
        assert_eq!(three.remove_range(3, Some(1)), three);
        assert_eq!(three.remove_range(0, Some(1)), list(&["bar", "baz"]));
        assert_eq!(three.remove_range(1, Some(2)), list(&["foo"]));
        assert_eq!(three.remove_range(1, None), list(&["foo"]));
        assert_eq!(three.remove_range(0, Some(-1)), list(&["baz"]));
    }

    #[test]
    fn test_extract() {
        let four = list(&["foo", "bar", "baz", "blub"]);
        assert_eq!(Array::new().extract(-1, Some(0)), Array::new());
        assert_eq!(four.extract(4, Some(1)), Array::new());
        assert_eq!(four.extract(3, Some(0)), Array::new());
        assert_eq!(four.extract(3, Some(1)), list(&["blub"]));
        assert_eq!(four.extract(3, Some(2)), list(&["blub"]));
        assert_eq!(four.extract(1, None), list(&["bar", "baz", "blub"]));
        assert_eq!(four.extract(1, Some(-1)), list(&["bar", "baz"]));
        assert_eq!(four.extract(0, None), four);
    }

    #[test]
    fn test_names_survive_renumbering() {
        let mut array = Array::new();
        array.insert(4, Value::from("a"));
        array.insert("name", Value::from("b"));
        let inserted = array.insert_at(0, Value::from("c"));
        assert_eq!(inserted.get(0), Some(&Value::from("c")));
        assert_eq!(inserted.get(1), Some(&Value::from("a")));
        assert_eq!(inserted.get("name"), Some(&Value::from("b")));
    }
}
