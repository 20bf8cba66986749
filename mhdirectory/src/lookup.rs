//! Case-insensitive lookup over directory records.
//!
//! Resolves a human-supplied name or email to a record by exact,
//! case-insensitive comparison against one or more named attributes.

use crate::error::{Error, Result};
use crate::models::{Device, LinkedUser, Resource};

/// Access to a record's textual attributes by name.
///
/// Only the attributes meaningful for lookup are exposed; unknown names
/// return `None`.
pub trait LookupFields {
    fn lookup_field(&self, name: &str) -> Option<&str>;
}

impl LookupFields for Resource {
    fn lookup_field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "clientIdentifier" => self.client_identifier.as_deref(),
            "product" => self.product.as_deref(),
            _ => None,
        }
    }
}

impl LookupFields for LinkedUser {
    fn lookup_field(&self, name: &str) -> Option<&str> {
        match name {
            "username" => Some(&self.username),
            "email" => Some(&self.email),
            "title" => self.title.as_deref(),
            _ => None,
        }
    }
}

impl LookupFields for Device {
    fn lookup_field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "clientIdentifier" => self.client_identifier.as_deref(),
            "product" => self.product.as_deref(),
            _ => None,
        }
    }
}

/// Find the first item whose named attributes match `query`.
///
/// Attributes are tried in the given order for each item; comparison is
/// case-insensitive and exact. The first matching item in iteration order
/// wins. Returns [`Error::NotFound`] naming the query when nothing matches.
pub fn find_by_attribute<'a, T: LookupFields>(
    items: &'a [T],
    query: &str,
    attrs: &[&str],
) -> Result<&'a T> {
    let wanted = query.to_lowercase();
    for item in items {
        for attr in attrs {
            if let Some(value) = item.lookup_field(attr) {
                if value.to_lowercase() == wanted {
                    return Ok(item);
                }
            }
        }
    }
    Err(Error::not_found(format!("Unable to find item {query}")))
}
