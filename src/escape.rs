//! XML escaping.
//!
//! ```rust
//! use typed_value::escape::{escape_xml, escape_xml_attribute, unescape_xml};
//!
//! assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
//! assert_eq!(escape_xml_attribute(r#"say "hi""#), "say &quot;hi&quot;");
//! assert_eq!(unescape_xml("&Auml;pfel &amp; Birnen", false), "Äpfel & Birnen");
//! assert_eq!(unescape_xml("&EURO; &#8364; &#x20AC;", true), "€ € €");
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RX_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]*);")
        .expect("entity pattern compiles")
});

/// Escapes `&`, `<` and `>` for XML text content.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    quick_xml::escape::partial_escape(text).into_owned()
}

/// Escapes `&`, `<`, `>`, `"` and `'` for XML attribute values.
#[must_use]
pub fn escape_xml_attribute(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Replaces XML entities with the characters they stand for.
///
/// The basic table knows `&lt; &gt; &quot; &#39; &amp;`, the German umlauts,
/// `&deg;` and `&szlig;`, all case-sensitive. With `full` the names match
/// case-insensitively, more named entities are known and numeric references
/// (`&#160;`, `&#xA0;`) are decoded. Unknown entities stay as written.
#[must_use]
pub fn unescape_xml(text: &str, full: bool) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    RX_ENTITY
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let resolved = if full {
                full_entity(name)
            } else {
                basic_entity(name)
            };
            match resolved {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn basic_entity(name: &str) -> Option<char> {
    let ch = match name {
        "auml" => 'ä',
        "Auml" => 'Ä',
        "ouml" => 'ö',
        "Ouml" => 'Ö',
        "uuml" => 'ü',
        "Uuml" => 'Ü',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "#39" => '\'',
        "amp" => '&',
        "deg" => '°',
        "szlig" => 'ß',
        _ => return None,
    };
    Some(ch)
}

fn full_entity(name: &str) -> Option<char> {
    // Umlauts keep their case: `&Auml;` and `&AUML;` are both `Ä`.
    let umlaut = match name {
        "auml" | "aUML" => Some('ä'),
        "ouml" | "oUML" => Some('ö'),
        "uuml" | "uUML" => Some('ü'),
        "Auml" | "AUML" => Some('Ä'),
        "Ouml" | "OUML" => Some('Ö'),
        "Uuml" | "UUML" => Some('Ü'),
        _ => None,
    };
    if umlaut.is_some() {
        return umlaut;
    }

    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code);
    }

    let ch = match name.to_ascii_lowercase().as_str() {
        "quot" => '"',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "iexcl" => '¡',
        "cent" => '¢',
        "pound" => '£',
        "copy" => '©',
        "reg" => '®',
        "deg" => '°',
        "euro" => '€',
        "szlig" => 'ß',
        _ => return None,
    };
    Some(ch)
}
