//! Nested values produced from XML documents.

use std::collections::BTreeMap;

use serde::Serialize;

/// Keyed children of an [`XmlValue::Mapping`].
pub type XmlMapping = BTreeMap<String, XmlValue>;

/// Output of XML tree conversion.
///
/// Serializes without tags: mappings as JSON objects, sequences as arrays,
/// scalars as strings, and `Null` as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum XmlValue {
    Null,
    Scalar(String),
    Sequence(Vec<XmlValue>),
    Mapping(XmlMapping),
}

impl XmlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, XmlValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            XmlValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[XmlValue]> {
        match self {
            XmlValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&XmlMapping> {
        match self {
            XmlValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Follows a chain of mapping keys, e.g. `["result", "recorddetail"]`.
    pub fn pointer<'a, I>(&self, path: I) -> Option<&XmlValue>
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter().try_fold(self, |value, key| value.get(key))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<&str> for XmlValue {
    fn from(value: &str) -> Self {
        XmlValue::Scalar(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> XmlValue {
        let mut inner = XmlMapping::new();
        inner.insert("FL".to_string(), XmlValue::Sequence(vec!["a".into(), "b".into()]));
        let mut root = XmlMapping::new();
        root.insert("detail".to_string(), XmlValue::Mapping(inner));
        root.insert("empty".to_string(), XmlValue::Null);
        XmlValue::Mapping(root)
    }

    #[test]
    fn test_pointer() {
        let value = sample();
        let items = value.pointer(["detail", "FL"]).and_then(XmlValue::as_sequence);
        assert_eq!(items.map(<[XmlValue]>::len), Some(2));
        assert!(value.pointer(["detail", "missing"]).is_none());
        assert!(value.get("empty").is_some_and(XmlValue::is_null));
    }

    #[test]
    fn test_untagged_json() {
        assert_eq!(
            sample().to_json(),
            json!({"detail": {"FL": ["a", "b"]}, "empty": null})
        );
    }
}
