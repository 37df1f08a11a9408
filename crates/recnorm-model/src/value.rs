//! Scalar field values and flat records.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// A flat record: field name to value.
///
/// Raw records come from a data source; normalized records carry renamed
/// field names and typed values. Both share this shape.
pub type Record = BTreeMap<String, FieldValue>;

/// A single field value, either raw (as produced by a data source) or typed
/// (as produced by a coercion function).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value.
    #[default]
    Null,
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
    /// Timezone-naive timestamp; serialized as ISO 8601.
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    /// Returns true for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Short name of the variant, for log fields and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::String(_) => "string",
            FieldValue::Float(_) => "float",
            FieldValue::Integer(_) => "integer",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Timestamp(_) => "timestamp",
        }
    }

    /// Converts to JSON. Timestamps become ISO 8601 strings.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// The textual form every coercion function starts from.
///
/// Floats always carry a fractional part (`1.0`), booleans render as
/// `True`/`False`, timestamps as `YYYY-MM-DD HH:MM:SS[.fff]`, and `Null`
/// renders as the empty string.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::String(value) => f.write_str(value),
            FieldValue::Float(value) if value.is_nan() => f.write_str("nan"),
            FieldValue::Float(value) => write!(f, "{value:?}"),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Boolean(true) => f.write_str("True"),
            FieldValue::Boolean(false) => f.write_str("False"),
            FieldValue::Timestamp(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Maps a JSON value onto a field value.
///
/// Integers that fit in `i64` stay integers; other numbers become floats.
/// Arrays and objects are kept as their compact JSON text.
impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(value) => FieldValue::Boolean(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(value) => FieldValue::Integer(value),
                None => FieldValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(value) => FieldValue::String(value),
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                FieldValue::String(other.to_string())
            }
        }
    }
}

/// Builds a record from a JSON object. Returns `None` for non-object input.
pub fn record_from_json(value: serde_json::Value) -> Option<Record> {
    match value {
        serde_json::Value::Object(map) => Some(
            map.into_iter()
                .map(|(field, value)| (field, FieldValue::from(value)))
                .collect(),
        ),
        _ => None,
    }
}
