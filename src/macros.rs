/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Lists become arrays keyed `0..n`; `{ "key": value }` blocks become arrays
/// keyed by name. Any other expression goes through [`to_value`](crate::to_value).
///
/// # Examples
///
/// ```rust
/// use typed_value::{value, Value};
///
/// let config = value!({
///     "name": "cache",
///     "enabled": true,
///     "ports": [8080, 8081]
/// });
///
/// let array = config.as_array().unwrap();
/// assert_eq!(array.get("enabled"), Some(&Value::Bool(true)));
/// assert_eq!(array.get("ports").and_then(Value::as_array).map(|a| a.len()), Some(2));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array($crate::Array::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(
            ::std::vec![$($crate::value!($elem)),*].into_iter().collect::<$crate::Array>()
        )
    };

    ({}) => {
        $crate::Value::Array($crate::Array::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut array = $crate::Array::new();
        $(
            array.insert($key, $crate::value!($value));
        )*
        $crate::Value::Array(array)
    }};

    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}
