//! Typed values stored in XML elements.
//!
//! A typed element names its type in a `type` attribute or a `<type>` child
//! and its value in a `value` attribute, a `<value>` child or its own text:
//!
//! ```rust
//! use typed_value::{xml, Value};
//!
//! assert_eq!(xml::xml_to_type(r#"<port type="int">8080</port>"#).unwrap(), Value::from(8080));
//! assert_eq!(
//!     xml::xml_to_type("<ratio><type>float</type><value>.25</value></ratio>").unwrap(),
//!     Value::from(0.25)
//! );
//! assert_eq!(xml::xml_to_type(r#"<flag value="1" />"#).unwrap(), Value::Null);
//! ```

use crate::coerce::str_to_type;
use crate::escape::unescape_xml;
use crate::{Error, Kind, Result, Value};
use log::trace;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A parsed element: its attributes, its own text and its child elements.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let mut element = Element {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            ..Default::default()
        };
        for attr in start.attributes() {
            let attr = attr.map_err(Error::xml)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = unescape_xml(&String::from_utf8_lossy(&attr.value), true);
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text of the first direct child with one of the given names.
    fn child_text(&self, names: &[&str]) -> Option<&str> {
        self.children
            .iter()
            .find(|child| names.contains(&child.name.as_str()))
            .map(|child| child.text.trim())
    }
}

fn parse_element(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(Error::xml)? {
            Event::Start(e) => stack.push(Element::open(&e)?),
            Event::Empty(e) => {
                let element = Element::open(&e)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::xml("closing tag without an open element"))?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(e) => {
                let text = e.decode().map_err(Error::xml)?;
                push_text(&mut stack, &unescape_xml(&text, true));
            }
            Event::GeneralRef(e) => {
                let name = e.decode().map_err(Error::xml)?;
                push_text(&mut stack, &unescape_xml(&format!("&{};", name), true));
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&raw));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::xml(format!("element <{}> is not closed", open.name)));
    }
    root.ok_or_else(|| Error::xml("document has no root element"))
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(Error::xml("document has more than one root element"))
    }
}

fn push_text(stack: &mut [Element], text: &str) {
    if let Some(current) = stack.last_mut() {
        current.text.push_str(text);
    }
}

/// Reads the typed value stored in an XML element.
///
/// The type comes from the `type` attribute or the first `<type>`/`<Type>`
/// child; without one the result is null. The value text comes from the
/// `value` attribute, the first `<value>`/`<Value>` child or the element's
/// own text, in that order, and is converted with
/// [`str_to_type`](crate::coerce::str_to_type).
///
/// # Errors
///
/// Returns [`Error::Xml`] for malformed XML and whatever
/// [`str_to_type`](crate::coerce::str_to_type) reports for the conversion.
pub fn xml_to_type(xml: &str) -> Result<Value> {
    let element = parse_element(xml)?;

    let type_name = match element
        .attribute("type")
        .or_else(|| element.child_text(&["type", "Type"]))
    {
        Some(name) => name,
        None => {
            trace!("element <{}> names no type", element.name);
            return Ok(Value::Null);
        }
    };

    let text = element
        .attribute("value")
        .or_else(|| element.child_text(&["value", "Value"]))
        .unwrap_or_else(|| element.text.trim());

    str_to_type(text, &Kind::from(type_name))
}

/// Returns the value of an attribute of the root element, or `default`.
///
/// # Errors
///
/// Returns [`Error::Xml`] for malformed XML.
///
/// ```rust
/// use typed_value::xml::attribute_value;
///
/// let xml = r#"<item id="7" label="A &amp; B"/>"#;
/// assert_eq!(attribute_value(xml, "label", None).unwrap().as_deref(), Some("A & B"));
/// assert_eq!(attribute_value(xml, "missing", Some("-")).unwrap().as_deref(), Some("-"));
/// assert_eq!(attribute_value(xml, "missing", None).unwrap(), None);
/// ```
pub fn attribute_value(xml: &str, name: &str, default: Option<&str>) -> Result<Option<String>> {
    let element = parse_element(xml)?;
    Ok(element
        .attribute(name)
        .or(default)
        .map(str::to_string))
}
