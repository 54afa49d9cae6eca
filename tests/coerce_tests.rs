use chrono::NaiveDate;
use std::any::Any;
use typed_value::coerce::{
    bool_value, convert_native, is_decimal, is_integer, is_native, kind_of, native_kind,
    str_to_type, string_value, try_parse_float, try_parse_integer,
};
use typed_value::ser::encode;
use typed_value::{value, Array, Error, Kind, Record, Resource, Structured, Value};

/// A structured value that renders a fixed text.
#[derive(Debug, Clone)]
struct Labelled(String);

impl Structured for Labelled {
    fn type_name(&self) -> &str {
        "Labelled"
    }

    fn properties(&self) -> Array {
        let mut props = Array::new();
        props.insert("label", Value::from(self.0.as_str()));
        props
    }

    fn render(&self) -> Option<String> {
        Some(self.0.clone())
    }

    fn clone_boxed(&self) -> Box<dyn Structured> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn plain_object() -> Value {
    Value::from(Record::new("Plain"))
}

fn handle() -> Value {
    Value::from(Resource::new(1, "stream"))
}

#[test]
fn test_is_integer() {
    assert!(is_integer(&Value::from(1)));
    assert!(is_integer(&Value::from("10")));
    assert!(is_integer(&Value::from(0x01)));
    assert!(is_integer(&Value::from(1.0)));
    assert!(!is_integer(&Value::from("a")));
    assert!(!is_integer(&Value::from(false)));
    assert!(!is_integer(&value!([])));
}

#[test]
fn test_try_parse_integer() {
    assert_eq!(try_parse_integer(&Value::from(10)), Some(10));
    assert_eq!(try_parse_integer(&Value::from("12345")), Some(12345));
    assert_eq!(try_parse_integer(&Value::from(true)), Some(1));
    assert_eq!(try_parse_integer(&Value::from(false)), Some(0));
    assert_eq!(try_parse_integer(&Value::from(14.2)), Some(14));
    assert_eq!(try_parse_integer(&Value::from(14.51)), Some(14));
    assert_eq!(try_parse_integer(&Value::from("abc")), None);
    assert_eq!(try_parse_integer(&Value::from((i64::MAX as f64) + 5000.0)), None);
    assert_eq!(try_parse_integer(&Value::from(-1e19)), None);
    assert_eq!(try_parse_integer(&Value::from(i64::MIN as f64)), Some(i64::MIN));
    assert_eq!(try_parse_integer(&plain_object()), None);
}

#[test]
fn test_integer_probe_and_parse_disagree_on_false() {
    let value = Value::from(false);
    assert!(!is_integer(&value));
    assert_eq!(try_parse_integer(&value), Some(0));
}

#[test]
fn test_is_decimal() {
    assert!(is_decimal(&Value::from(1), false));
    assert!(is_decimal(&Value::from(1.0), false));
    assert!(is_decimal(&Value::from("145"), false));
    assert!(is_decimal(&Value::from("145,5"), true));
    assert!(!is_decimal(&Value::from("145,5"), false));
    assert!(is_decimal(&Value::from("145.5"), false));
}

#[test]
fn test_try_parse_float() {
    assert_eq!(try_parse_float(&Value::from(10), false), Some(10.0));
    assert_eq!(try_parse_float(&Value::from("12345"), false), Some(12345.0));
    assert_eq!(try_parse_float(&Value::from(true), false), Some(1.0));
    assert_eq!(try_parse_float(&Value::from(14.4), false), Some(14.4));
    assert_eq!(try_parse_float(&Value::from("14.4"), false), Some(14.4));
    assert_eq!(try_parse_float(&Value::from("14,4"), true), Some(14.4));
    assert_eq!(try_parse_float(&Value::from("14,4"), false), None);
    assert_eq!(try_parse_float(&Value::from("14-4"), true), None);
    assert_eq!(try_parse_float(&Value::from("abc"), false), None);
    assert_eq!(try_parse_float(&plain_object(), false), None);
}

#[test]
fn test_bool_value() {
    assert_eq!(bool_value(&Value::Null), None);
    assert_eq!(bool_value(&Value::from(false)), Some(false));
    assert_eq!(bool_value(&Value::from(true)), Some(true));
    assert_eq!(bool_value(&Value::from(1)), Some(true));
    assert_eq!(bool_value(&handle()), Some(true));
    assert_eq!(
        bool_value(&Value::object(Labelled("false".to_string()))),
        Some(false)
    );
    assert_eq!(bool_value(&plain_object()), None);
    assert_eq!(bool_value(&value!([])), Some(false));
    assert_eq!(bool_value(&value!([0, 1])), Some(true));
    assert_eq!(bool_value(&Value::from(14.4)), Some(true));
    assert_eq!(bool_value(&Value::from(encode(&Value::from(false)))), Some(false));
    assert_eq!(bool_value(&Value::from("b:1;")), Some(true));
    assert_eq!(bool_value(&Value::from("")), Some(false));
    assert_eq!(bool_value(&Value::from("yes")), Some(true));
    assert_eq!(bool_value(&Value::from("foo")), None);
}

#[test]
fn test_bool_value_tokens() {
    for truthy in ["1", "7", "0.5", "t", "TRUE", "On", "ok", "enabled", "selected"] {
        assert_eq!(bool_value(&Value::from(truthy)), Some(true), "{}", truthy);
    }
    for falsy in ["0", "-3", "-0.5", "f", "False", "OFF", "no", "out"] {
        assert_eq!(bool_value(&Value::from(falsy)), Some(false), "{}", falsy);
    }
    assert_eq!(bool_value(&Value::from(-2)), Some(false));
    assert_eq!(bool_value(&Value::from(Resource::new(1, "stream").closed())), None);
}

#[test]
fn test_string_value() {
    assert_eq!(string_value(&Value::Null).as_deref(), Some(""));
    assert_eq!(string_value(&Value::from("foo")).as_deref(), Some("foo"));
    assert_eq!(string_value(&Value::from(false)).as_deref(), Some("false"));
    assert_eq!(string_value(&handle()), None);

    let date = NaiveDate::from_ymd_opt(2017, 12, 24)
        .and_then(|d| d.and_hms_opt(12, 24, 36))
        .unwrap();
    assert_eq!(
        string_value(&Value::from(date)).as_deref(),
        Some("2017-12-24 12:24:36")
    );

    let list = value!(["foo"]);
    assert_eq!(string_value(&list), Some(encode(&list)));
    assert_eq!(string_value(&Value::from(-123)).as_deref(), Some("-123"));
    assert_eq!(string_value(&Value::from(12.3)).as_deref(), Some("12.3"));
    assert_eq!(string_value(&plain_object()), None);
}

#[test]
fn test_str_to_type() {
    assert_eq!(str_to_type("1", &Kind::Boolean).unwrap(), Value::from(true));
    assert_eq!(str_to_type("14.4", &Kind::from("int")).unwrap(), Value::from(14));
    assert_eq!(str_to_type("14.4", &Kind::from("integer")).unwrap(), Value::from(14));
    assert_eq!(str_to_type("", &Kind::Integer).unwrap(), Value::from(0));
    assert_eq!(str_to_type("blub", &Kind::Integer).unwrap(), Value::Null);
    assert_eq!(str_to_type("14.4", &Kind::Float).unwrap(), Value::from(14.4));
    assert_eq!(str_to_type("", &Kind::Float).unwrap(), Value::from(0.0));
    assert_eq!(str_to_type("sadas", &Kind::Float).unwrap(), Value::Null);
    assert_eq!(
        str_to_type("14.000,4", &Kind::String).unwrap(),
        Value::from("14.000,4")
    );
}

#[test]
fn test_str_to_type_array() {
    assert_eq!(str_to_type("", &Kind::Array).unwrap(), value!([]));
    assert_eq!(
        str_to_type(&encode(&value!(["foo"])), &Kind::Array).unwrap(),
        value!(["foo"])
    );
    assert_eq!(str_to_type(r#"["foo"]"#, &Kind::Array).unwrap(), value!(["foo"]));
    assert_eq!(
        str_to_type(r#"{"a":1}"#, &Kind::Array).unwrap(),
        value!({"a": 1})
    );
    assert_eq!(
        str_to_type("[abc-def>d]", &Kind::Array).unwrap(),
        value!(["[abc-def>d]"])
    );
    assert_eq!(str_to_type("a:bc-def", &Kind::Array).unwrap(), value!(["a:bc-def"]));
    assert_eq!(
        str_to_type("{abc-def>d}", &Kind::Array).unwrap(),
        value!(["{abc-def>d}"])
    );
}

#[test]
fn test_str_to_type_named() {
    let record = Value::from(Record::new("Serializeable").with("foo", "2017-12-24 12:00:00"));
    let decoded = str_to_type(&encode(&record), &Kind::from("Serializeable")).unwrap();
    assert_eq!(decoded, record);

    let date = NaiveDate::from_ymd_opt(2017, 8, 12)
        .and_then(|d| d.and_hms_opt(14, 23, 0))
        .unwrap();
    let encoded = encode(&Value::from(date));
    assert_eq!(
        str_to_type(&encoded, &Kind::from("DateTime")).unwrap(),
        Value::from(date)
    );

    assert_eq!(str_to_type("", &Kind::from("DateTime")).unwrap(), Value::Null);
    assert_eq!(str_to_type("ab", &Kind::from("DateTime")).unwrap(), Value::Null);
    assert_eq!(
        str_to_type(&encode(&record), &Kind::from("DateTime")).unwrap(),
        Value::Null
    );
}

#[test]
fn test_is_native() {
    assert!(!is_native(&Value::Null));
    assert!(is_native(&Value::from(11)));
    assert!(is_native(&Value::from(0.147)));
    assert!(is_native(&Value::from(false)));
    assert!(is_native(&Value::from("dfsdf")));
    assert!(is_native(&value!([1])));
    assert!(!is_native(&plain_object()));
    assert!(!is_native(&handle()));
}

#[test]
fn test_native_kind() {
    assert_eq!(native_kind(&value!([])), Some(Kind::Array));
    assert_eq!(native_kind(&Value::from(0.147)), Some(Kind::Float));
    assert_eq!(native_kind(&Value::from(147)), Some(Kind::Integer));
    assert_eq!(native_kind(&Value::from(true)), Some(Kind::Boolean));
    assert_eq!(native_kind(&Value::from("sds")), Some(Kind::String));
    assert_eq!(native_kind(&plain_object()), None);
}

#[test]
fn test_kind_of() {
    assert_eq!(kind_of(&value!([])).name(), "array");
    assert_eq!(kind_of(&Value::from(0.147)).name(), "float");
    assert_eq!(kind_of(&Value::from(0o775)).name(), "int");
    assert_eq!(kind_of(&Value::from(true)).name(), "bool");
    assert_eq!(kind_of(&Value::from("sds")).name(), "string");
    assert_eq!(kind_of(&Value::Null).name(), "null");
    assert_eq!(kind_of(&handle()).name(), "resource");
    assert_eq!(kind_of(&Value::from(Resource::new(1, "stream").closed())), Kind::Unknown);

    let now = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();
    assert_eq!(kind_of(&Value::from(now)).name(), "DateTime");
}

#[test]
fn test_convert_native() {
    assert_eq!(convert_native(&Value::Null, &Kind::Null).unwrap(), Value::Null);
    assert_eq!(convert_native(&Value::from("123"), &Kind::Integer).unwrap(), Value::from(123));
    assert_eq!(convert_native(&Value::from("1"), &Kind::Boolean).unwrap(), Value::from(true));
    assert_eq!(
        convert_native(&Value::from("false"), &Kind::from("boolean")).unwrap(),
        Value::from(false)
    );
    assert_eq!(convert_native(&Value::from("123"), &Kind::Float).unwrap(), Value::from(123.0));
    assert_eq!(convert_native(&Value::from("123"), &Kind::String).unwrap(), Value::from("123"));
    assert_eq!(convert_native(&Value::from(true), &Kind::String).unwrap(), Value::from("1"));
    assert_eq!(convert_native(&Value::from(true), &Kind::Float).unwrap(), Value::from(1.0));
    assert_eq!(convert_native(&Value::from(true), &Kind::Integer).unwrap(), Value::from(1));
    assert_eq!(convert_native(&Value::from(14.4), &Kind::Integer).unwrap(), Value::from(14));
    assert_eq!(convert_native(&Value::from(-1.4), &Kind::Boolean).unwrap(), Value::from(false));
    assert_eq!(convert_native(&Value::from(1.44), &Kind::String).unwrap(), Value::from("1.44"));
    assert_eq!(convert_native(&Value::from(14), &Kind::Float).unwrap(), Value::from(14.0));
    assert_eq!(convert_native(&Value::from(0), &Kind::Boolean).unwrap(), Value::from(false));
    assert_eq!(convert_native(&Value::from(-144), &Kind::String).unwrap(), Value::from("-144"));
}

#[test]
fn test_convert_native_rejects_non_native_source() {
    let err = convert_native(&plain_object(), &Kind::String).unwrap_err();
    match err {
        Error::InvalidArgument { name, .. } => assert_eq!(name, "source_value"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_convert_native_rejects_unsupported_pairs() {
    let cases = [
        (Value::from(false), Kind::Array),
        (Value::from("123"), Kind::Resource),
        (Value::from(12.3), Kind::Resource),
        (Value::from(12), Kind::Resource),
    ];
    for (source, target) in cases {
        match convert_native(&source, &target) {
            Err(Error::InvalidArgument { name, .. }) => assert_eq!(name, "new_type"),
            other => panic!("{:?} -> {}: unexpected {:?}", source, target, other),
        }
    }
}

#[test]
fn test_str_to_type_large_json_array() {
    let n = 50_000;
    let text = format!(
        "[{}]",
        (0..n).map(|i| i.to_string()).collect::<Vec<_>>().join(",")
    );
    let value = str_to_type(&text, &Kind::Array).unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), n);
    assert!(array.is_list());
    assert_eq!(array.get(n - 1), Some(&Value::from(n as i64 - 1)));
}
