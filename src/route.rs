//! Route keys and attribute values.
//!
//! A routing-table observation is a sequence of `(RouteKey, AttrValue)`
//! pairs. Keys identify a record (typically a destination prefix);
//! attribute values carry whatever the device reports alongside it
//! (next hop, protocol, metric, ...).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a record within a routing table.
///
/// Usually a destination prefix such as `10.0.0.0/24`, but the core
/// treats it as an opaque string: it only needs equality and hashing.
///
/// # Examples
///
/// ```
/// use routewatch::RouteKey;
///
/// let key = RouteKey::new("10.0.0.0/24");
/// assert_eq!(key.as_str(), "10.0.0.0/24");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteKey(String);

impl RouteKey {
    /// Creates a route key from any string-like value.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RouteKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Attribute value attached to a route key.
///
/// Composite values use `BTreeMap`, so field order inside an attribute
/// is normalized by construction: two attribute values built from the
/// same fields in different orders compare equal. This keeps the differ
/// from reporting a "modified" route when a device merely re-serialized
/// unchanged attributes.
///
/// # Examples
///
/// ```
/// use routewatch::AttrValue;
///
/// let a = AttrValue::map([("next-hop", "10.1.1.1"), ("proto", "bgp")]);
/// let b = AttrValue::map([("proto", "bgp"), ("next-hop", "10.1.1.1")]);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Absent or explicitly null attribute.
    Null,
    /// Boolean flag (e.g. `active`).
    Bool(bool),
    /// Integer attribute (e.g. metric, preference).
    Int(i64),
    /// Floating-point attribute.
    Float(f64),
    /// Free-form string attribute (e.g. next-hop, interface name).
    String(String),
    /// Ordered list of values (e.g. AS path).
    List(Vec<AttrValue>),
    /// Named fields, order-normalized.
    Map(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    /// Builds a `Map` value from string pairs.
    #[must_use]
    pub fn map<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::Map(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), Self::String(v.to_string())))
                .collect(),
        )
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Looks up a field on a `Map` value.
    pub fn get(&self, field: &str) -> Option<&AttrValue> {
        match self {
            Self::Map(fields) => fields.get(field),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("<unprintable>"),
        }
    }
}
