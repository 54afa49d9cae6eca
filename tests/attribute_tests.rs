use chrono::NaiveDate;
use typed_value::attributes::{create_attribute_string, parse_attributes};
use typed_value::escape::{escape_xml, escape_xml_attribute, unescape_xml};
use typed_value::xml::{attribute_value, xml_to_type};
use typed_value::{value, Array, AttributeOptions, Error, Key, Record, Value};

const ATTRIBUTES: &str =
    r#"foo=":-)" Bar='1' baz="12" enabled="true" abc="&lt;strong&gt;Text&lt;/strong&gt;""#;

#[test]
fn test_parse_attributes() {
    let attrs = parse_attributes(ATTRIBUTES, &AttributeOptions::new()).unwrap();
    let expected = value!({
        "foo": ":-)",
        "Bar": true,
        "baz": "12",
        "enabled": true,
        "abc": "<strong>Text</strong>"
    });
    assert_eq!(Value::Array(attrs), expected);
}

#[test]
fn test_parse_attributes_lower_keys() {
    let options = AttributeOptions::new().with_lower_keys(true);
    let attrs = parse_attributes(ATTRIBUTES, &options).unwrap();
    assert_eq!(attrs.get("bar"), Some(&Value::Bool(true)));
    assert_eq!(attrs.get("Bar"), None);
    let keys: Vec<String> = attrs.keys().map(Key::to_string).collect();
    assert_eq!(keys, vec!["foo", "bar", "baz", "enabled", "abc"]);
}

#[test]
fn test_parse_attributes_without_auto_boolean() {
    let attrs = parse_attributes(ATTRIBUTES, &AttributeOptions::raw()).unwrap();
    assert_eq!(attrs.get("Bar"), Some(&Value::from("1")));
    assert_eq!(attrs.get("enabled"), Some(&Value::from("true")));
    assert_eq!(attrs.get("abc"), Some(&Value::from("<strong>Text</strong>")));
}

#[test]
fn test_parse_attributes_edge_cases() {
    let options = AttributeOptions::new();
    assert!(parse_attributes(r#"Foo"BAR">BAZ"#, &options).unwrap().is_empty());
    assert!(parse_attributes("", &options).unwrap().is_empty());

    let attrs = parse_attributes(r#" multiple="multiple""#, &options).unwrap();
    assert_eq!(Value::Array(attrs), value!({"multiple": true}));

    let attrs = parse_attributes("a='x'\n\tb=\"y\"", &options).unwrap();
    assert_eq!(attrs.len(), 2);
}

#[test]
fn test_parse_attributes_later_duplicate_wins() {
    let attrs = parse_attributes(r#"a="1x" a="2x""#, &AttributeOptions::new()).unwrap();
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs.get("a"), Some(&Value::from("2x")));
}

#[test]
fn test_create_attribute_string() {
    let date = NaiveDate::from_ymd_opt(2016, 6, 21)
        .and_then(|d| d.and_hms_opt(13, 0, 0))
        .unwrap();
    let mut attrs = Array::new();
    attrs.insert("a", Value::from(4));
    attrs.insert("b", Value::from(false));
    attrs.insert(5, Value::from(r#"A"B""#));
    attrs.insert(6, Value::from(date));

    assert_eq!(
        create_attribute_string(&attrs).unwrap(),
        r#" a="4" b="0" _5="A&quot;B&quot;" _6="2016-06-21 13:00:00""#
    );
}

#[test]
fn test_create_attribute_string_empty_and_list() {
    assert_eq!(create_attribute_string(&Array::new()).unwrap(), "");
    let list: Array = vec![Value::from("a"), Value::from("b")].into();
    assert_eq!(create_attribute_string(&list).unwrap(), "");
}

#[test]
fn test_create_attribute_string_rejects_objects() {
    let mut attrs = Array::new();
    attrs.insert("a", Value::from(1));
    attrs.insert("obj", Value::from(Record::new("Plain")));

    match create_attribute_string(&attrs) {
        Err(Error::InvalidArgument { name, reason, .. }) => {
            assert_eq!(name, "attributes[obj]");
            assert!(reason.starts_with("Unsupported value type!"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_attribute_string_parses_back() {
    let mut attrs = Array::new();
    attrs.insert("title", Value::from("Tom & \"Jerry\""));
    attrs.insert("checked", Value::from(true));

    let rendered = create_attribute_string(&attrs).unwrap();
    let parsed = parse_attributes(&rendered, &AttributeOptions::new()).unwrap();
    assert_eq!(parsed.get("title"), Some(&Value::from("Tom & \"Jerry\"")));
    assert_eq!(parsed.get("checked"), Some(&Value::Bool(true)));
}

#[test]
fn test_escape_xml() {
    assert_eq!(escape_xml(r#"<foo&"'bar>"#), r#"&lt;foo&amp;"'bar&gt;"#);
    assert_eq!(escape_xml_attribute(r#"<foo&"'bar>"#), "&lt;foo&amp;&quot;&#39;bar&gt;");
}

#[test]
fn test_unescape_xml() {
    assert_eq!(
        unescape_xml(
            "&lt;&gt;&quot;&amp;&auml;&Auml;&ouml;&Ouml;&uuml;&Uuml;&#39;&deg;&szlig;",
            false
        ),
        "<>\"&äÄöÖüÜ'°ß"
    );
    assert_eq!(unescape_xml("&euro;&nbsp;&#80;", false), "&euro;&nbsp;&#80;");
    assert_eq!(
        unescape_xml("&euro;&#80;&LT;&#x3E;&Quot;&amp;&Auml;&#039;&copy;&nbsp;", true),
        "€P<>\"&Ä'©\u{a0}"
    );
}

#[test]
fn test_escape_round_trip() {
    let text = r#"if a < b && c > "d" then 'e'"#;
    assert_eq!(unescape_xml(&escape_xml_attribute(text), false), text);
    assert_eq!(unescape_xml(&escape_xml(text), true), text);
}

#[test]
fn test_xml_to_type() {
    assert_eq!(xml_to_type(r#"<config1 type="int">14</config1>"#).unwrap(), Value::from(14));
    assert_eq!(
        xml_to_type(
            "<config2>\n  <type>float</type>\n  <value>.147</value>\n</config2>"
        )
        .unwrap(),
        Value::from(0.147)
    );
    assert_eq!(
        xml_to_type(r#"<config3 type="bool" value="false" />"#).unwrap(),
        Value::from(false)
    );
    assert_eq!(
        xml_to_type("<config4>\n  <Type>string</Type>\n  <Value>foo bar</Value>\n</config4>")
            .unwrap(),
        Value::from("foo bar")
    );
    assert_eq!(xml_to_type(r#"<config5 foo="1" />"#).unwrap(), Value::Null);
}

#[test]
fn test_xml_to_type_with_prolog_and_array() {
    let xml = r#"<?xml version="1.0" encoding="utf-8" ?>
<list type="array">[1, 2, 3]</list>"#;
    assert_eq!(xml_to_type(xml).unwrap(), value!([1, 2, 3]));
}

#[test]
fn test_xml_to_type_malformed() {
    assert!(matches!(xml_to_type("<config type=\"int\">14"), Err(Error::Xml(_))));
    assert!(matches!(xml_to_type("not xml at all"), Err(Error::Xml(_))));
}

#[test]
fn test_attribute_value() {
    let xml = r#"<node name="first" note='a &lt; b' />"#;
    assert_eq!(attribute_value(xml, "name", None).unwrap().as_deref(), Some("first"));
    assert_eq!(attribute_value(xml, "note", None).unwrap().as_deref(), Some("a < b"));
    assert_eq!(
        attribute_value(xml, "missing", Some("fallback")).unwrap().as_deref(),
        Some("fallback")
    );
    assert_eq!(attribute_value(xml, "missing", None).unwrap(), None);
}
