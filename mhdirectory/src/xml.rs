//! XML attribute-bag helpers.
//!
//! Directory responses are flat XML documents whose elements carry all data
//! as attributes. These helpers coerce attribute strings into typed values;
//! malformed or absent values default instead of failing, record parsing
//! never panics on bad input.

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::io::BufReader;
use std::str::FromStr;
use xmltree::{Element, XMLNode};

/// Parse the root element of a response body
pub(crate) fn parse_root(body: &str) -> Result<Element> {
    let reader = BufReader::new(body.as_bytes());
    Ok(Element::parse(reader)?)
}

/// Parse a container response into its top-level child elements,
/// preserving document order. An empty body yields an empty list.
pub(crate) fn parse_children(body: &str) -> Result<Vec<Element>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let root = parse_root(body)?;
    Ok(root
        .children
        .into_iter()
        .filter_map(|node| match node {
            XMLNode::Element(elem) => Some(elem),
            _ => None,
        })
        .collect())
}

/// Child elements of `elem` with the given tag name, in document order
pub(crate) fn child_elements<'a>(elem: &'a Element, name: &str) -> Vec<&'a Element> {
    elem.children
        .iter()
        .filter_map(|node| node.as_element())
        .filter(|child| child.name == name)
        .collect()
}

/// String attribute, cloned out of the element
pub(crate) fn attr(elem: &Element, name: &str) -> Option<String> {
    elem.attributes.get(name).cloned()
}

/// Boolean attribute: "1" or "true" (any case) is true, everything else false
pub(crate) fn attr_bool(elem: &Element, name: &str) -> bool {
    match elem.attributes.get(name) {
        Some(value) => value == "1" || value.eq_ignore_ascii_case("true"),
        None => false,
    }
}

/// Numeric attribute parsed with `FromStr`; malformed values yield None
pub(crate) fn attr_parse<T: FromStr>(elem: &Element, name: &str) -> Option<T> {
    elem.attributes.get(name).and_then(|v| v.parse::<T>().ok())
}

/// Timestamp attribute given as epoch seconds
pub(crate) fn attr_datetime(elem: &Element, name: &str) -> Option<DateTime<Utc>> {
    attr_parse::<i64>(elem, name).and_then(|secs| DateTime::from_timestamp(secs, 0))
}
