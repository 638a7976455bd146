//! Firestore REST value encoding.
//!
//! Every field value on the wire is a single-key JSON object naming its type,
//! e.g. `{"stringValue": "abc"}` or `{"integerValue": "42"}`. Serde's external
//! tagging maps that shape directly onto [`Value`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field map of a document or of a nested `mapValue`.
pub type Fields = BTreeMap<String, Value>;

/// A single typed field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(Option<NullMarker>),
    BooleanValue(bool),
    IntegerValue(#[serde(with = "integer_string")] i64),
    DoubleValue(f64),
    TimestampValue(DateTime<Utc>),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

/// The only value the protobuf `NullValue` enum has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullMarker {
    #[serde(rename = "NULL_VALUE")]
    NullValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

/// Empty arrays arrive as `{}` with no `values` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

/// Empty maps arrive as `{}` with no `fields` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: Fields,
}

impl Value {
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::StringValue(s.into())
    }

    #[must_use]
    pub const fn null() -> Self {
        Self::NullValue(None)
    }

    /// Borrow the string payload, if this is a `stringValue`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::StringValue(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::BooleanValue(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::TimestampValue(ts) => Some(*ts),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::ArrayValue(array) => Some(&array.values),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&Fields> {
        match self {
            Self::MapValue(map) => Some(&map.fields),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::NullValue(_))
    }

    /// Render scalar values as display text.
    ///
    /// The mobile app is loose about types (phone numbers and prices are
    /// sometimes numbers), so text columns accept any scalar. Empty strings
    /// and non-scalars yield `None`.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::StringValue(s) if !s.is_empty() => Some(s.clone()),
            Self::IntegerValue(i) => Some(i.to_string()),
            Self::DoubleValue(d) => Some(d.to_string()),
            Self::BooleanValue(b) => Some(b.to_string()),
            Self::ReferenceValue(r) => Some(r.clone()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::StringValue(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::StringValue(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::BooleanValue(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::IntegerValue(i)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::TimestampValue(ts)
    }
}

impl From<Vec<Self>> for Value {
    fn from(values: Vec<Self>) -> Self {
        Self::ArrayValue(ArrayValue { values })
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Self::MapValue(MapValue { fields })
    }
}

/// Typed accessors over a field map.
pub trait FieldsExt {
    /// A `stringValue` field, ignoring other types.
    fn str_field(&self, name: &str) -> Option<&str>;
    /// Any scalar field rendered as non-empty text.
    fn text_field(&self, name: &str) -> Option<String>;
    fn bool_field(&self, name: &str) -> Option<bool>;
    fn timestamp_field(&self, name: &str) -> Option<DateTime<Utc>>;
    /// String entries of an `arrayValue` field, in order.
    fn string_array_field(&self, name: &str) -> Vec<String>;
    fn map_field(&self, name: &str) -> Option<&Fields>;
}

impl FieldsExt for Fields {
    fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    fn text_field(&self, name: &str) -> Option<String> {
        self.get(name).and_then(Value::to_text)
    }

    fn bool_field(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    fn timestamp_field(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name).and_then(Value::as_timestamp)
    }

    fn string_array_field(&self, name: &str) -> Vec<String> {
        self.get(name)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn map_field(&self, name: &str) -> Option<&Fields> {
        self.get(name).and_then(Value::as_map)
    }
}

/// `integerValue` is an int64 carried as a decimal string; accept bare numbers too.
mod integer_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.parse().map_err(D::Error::custom),
            Raw::Number(n) => Ok(n),
        }
    }
}
