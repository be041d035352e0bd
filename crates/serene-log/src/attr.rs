//! Log attributes.
//!
//! An [`Attribute`] is an immutable key/value pair. Values are scalars,
//! timestamps, or nested groups of attributes that serialize as JSON objects.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// The value half of an [`Attribute`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A text value.
    String(String),
    /// A signed integer.
    I64(i64),
    /// An unsigned integer.
    U64(u64),
    /// A floating point number.
    F64(f64),
    /// A boolean.
    Bool(bool),
    /// A UTC timestamp, serialized as RFC 3339 with millisecond precision.
    Time(DateTime<Utc>),
    /// A nested group of attributes, serialized as a JSON object.
    Group(Vec<Attribute>),
}

impl Value {
    /// Returns the text if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the members if this is a group value.
    #[must_use]
    pub fn as_group(&self) -> Option<&[Attribute]> {
        match self {
            Self::Group(attrs) => Some(attrs),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::I64(i64::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::U64(u64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

impl From<Vec<Attribute>> for Value {
    fn from(value: Vec<Attribute>) -> Self {
        Self::Group(value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::I64(n) => serializer.serialize_i64(*n),
            Self::U64(n) => serializer.serialize_u64(*n),
            Self::F64(n) => serializer.serialize_f64(*n),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Time(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Self::Group(attrs) => AttrMap(attrs).serialize(serializer),
        }
    }
}

/// A key/value pair attached to a log record.
///
/// # Example
///
/// ```
/// use serene_log::Attribute;
///
/// let attr = Attribute::string("user.id", "u-123");
/// assert_eq!(attr.key, "user.id");
/// assert_eq!(attr.value.as_str(), Some("u-123"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The attribute key. Keys are not required to be unique.
    pub key: String,
    /// The attribute value.
    pub value: Value,
}

impl Attribute {
    /// Creates an attribute from any convertible value.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a string attribute.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    /// Creates a signed integer attribute.
    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, Value::I64(value))
    }

    /// Creates an unsigned integer attribute.
    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, Value::U64(value))
    }

    /// Creates a float attribute.
    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, Value::F64(value))
    }

    /// Creates a boolean attribute.
    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    /// Creates a timestamp attribute.
    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::new(key, Value::Time(value))
    }

    /// Creates a group attribute.
    pub fn group(key: impl Into<String>, attrs: Vec<Attribute>) -> Self {
        Self::new(key, Value::Group(attrs))
    }

    /// Returns true for the empty attribute (empty key, empty group).
    ///
    /// Empty attributes are never serialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && matches!(&self.value, Value::Group(attrs) if attrs.is_empty())
    }
}

/// Serializes a list of attributes as one JSON object.
///
/// Entries keep their order and duplicates are written as-is. Empty
/// attributes are skipped and a group with an empty key is inlined into its
/// parent.
pub(crate) struct AttrMap<'a>(pub(crate) &'a [Attribute]);

impl Serialize for AttrMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        write_entries(&mut map, self.0)?;
        map.end()
    }
}

fn write_entries<M: SerializeMap>(map: &mut M, attrs: &[Attribute]) -> Result<(), M::Error> {
    for attr in attrs {
        if attr.is_empty() {
            continue;
        }
        match &attr.value {
            Value::Group(members) if attr.key.is_empty() => write_entries(map, members)?,
            value => map.serialize_entry(&attr.key, value)?,
        }
    }
    Ok(())
}
