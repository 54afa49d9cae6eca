//! Configuration options for attribute parsing.
//!
//! [`AttributeOptions`] controls how
//! [`parse_attributes`](crate::attributes::parse_attributes) shapes its result.
//!
//! ## Examples
//!
//! ```rust
//! use typed_value::{attributes::parse_attributes, AttributeOptions, Value};
//!
//! let attrs = parse_attributes(r#"Checked="checked""#, &AttributeOptions::new()).unwrap();
//! assert_eq!(attrs.get("Checked"), Some(&Value::Bool(true)));
//!
//! let options = AttributeOptions::new().with_lower_keys(true).with_auto_boolean(false);
//! let attrs = parse_attributes(r#"Checked="checked""#, &options).unwrap();
//! assert_eq!(attrs.get("checked"), Some(&Value::from("checked")));
//! ```

/// Options for attribute parsing.
///
/// # Examples
///
/// ```rust
/// use typed_value::AttributeOptions;
///
/// let options = AttributeOptions::new();
/// assert!(!options.lower_keys);
/// assert!(options.auto_boolean);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeOptions {
    /// Lower-case attribute names.
    pub lower_keys: bool,
    /// Turn boolean-looking values and boolean attributes into [`Value::Bool`](crate::Value::Bool).
    pub auto_boolean: bool,
}

impl Default for AttributeOptions {
    fn default() -> Self {
        AttributeOptions {
            lower_keys: false,
            auto_boolean: true,
        }
    }
}

impl AttributeOptions {
    /// Creates default options: keys as written, automatic booleans.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that keep every value as a string.
    ///
    /// ```rust
    /// use typed_value::AttributeOptions;
    ///
    /// assert!(!AttributeOptions::raw().auto_boolean);
    /// ```
    #[must_use]
    pub fn raw() -> Self {
        AttributeOptions {
            auto_boolean: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_lower_keys(mut self, lower_keys: bool) -> Self {
        self.lower_keys = lower_keys;
        self
    }

    #[must_use]
    pub fn with_auto_boolean(mut self, auto_boolean: bool) -> Self {
        self.auto_boolean = auto_boolean;
        self
    }
}
