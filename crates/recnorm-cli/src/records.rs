//! JSON file handling for the `recnorm` commands.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;

use recnorm_model::{ModuleConfig, Record, record_from_json};
use recnorm_normalization::{
    CoerceOptions, DtypeRegistry, Result as NormalizationResult, coerce, exclude_keys, normalize,
    rename, sanitize_field,
};

/// Parse one record object, or an array of record objects.
pub fn parse_records(text: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(text).context("parse records JSON")?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                record_from_json(item).ok_or_else(|| anyhow!("record {index} is not a JSON object"))
            })
            .collect(),
        Value::Object(_) => record_from_json(value)
            .map(|record| vec![record])
            .ok_or_else(|| anyhow!("record is not a JSON object")),
        _ => bail!("expected a record object or an array of records"),
    }
}

pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read records {}", path.display()))?;
    parse_records(&text).with_context(|| format!("load records {}", path.display()))
}

/// Parse a JSON object whose values are strings or null.
pub fn parse_optional_map(text: &str) -> Result<BTreeMap<String, Option<String>>> {
    let value: Value = serde_json::from_str(text).context("parse JSON")?;
    let Value::Object(entries) = value else {
        bail!("expected a JSON object of field names");
    };
    entries
        .into_iter()
        .map(|(field, value)| match value {
            Value::Null => Ok((field, None)),
            Value::String(text) => Ok((field, Some(text))),
            other => Err(anyhow!("field '{field}' must map to a string or null, got {other}")),
        })
        .collect()
}

pub fn read_optional_map(path: &Path) -> Result<BTreeMap<String, Option<String>>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_optional_map(&text).with_context(|| format!("load {}", path.display()))
}

/// Rename every field to its sanitized name.
pub fn sanitized_renames<'a, I>(fields: I) -> BTreeMap<String, Option<String>>
where
    I: IntoIterator<Item = &'a String>,
{
    fields
        .into_iter()
        .map(|field| (field.clone(), Some(sanitize_field(field))))
        .collect()
}

/// Normalize each record with `config`.
///
/// With `keep_unconfigured`, fields the module does not mention pass through
/// coerced to strings instead of being dropped.
pub fn normalize_records(
    registry: &DtypeRegistry,
    config: &ModuleConfig,
    records: &[Record],
    keep_unconfigured: bool,
) -> Result<Vec<Record>> {
    if !keep_unconfigured {
        return records
            .iter()
            .map(|record| normalize(registry, config, record))
            .collect::<NormalizationResult<Vec<_>>>()
            .with_context(|| format!("normalize module {}", config.module_name));
    }

    let excluded: Vec<&String> = config
        .fields
        .values()
        .filter(|field| !field.include)
        .map(|field| &field.source_name)
        .collect();
    let dtypes = config.dtype_map();
    let renames = config.rename_map();
    records
        .iter()
        .map(|record| -> NormalizationResult<Record> {
            let kept = exclude_keys(record, &excluded);
            let coerced = coerce(registry, &kept, &dtypes, CoerceOptions::lenient())?;
            Ok(rename(&coerced, &renames))
        })
        .collect::<NormalizationResult<Vec<_>>>()
        .with_context(|| format!("normalize module {}", config.module_name))
}

/// JSON array of records.
pub fn records_to_json(records: &[Record]) -> Value {
    Value::Array(
        records
            .iter()
            .map(|record| {
                Value::Object(
                    record
                        .iter()
                        .map(|(field, value)| (field.clone(), value.to_json()))
                        .collect(),
                )
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use recnorm_model::FieldValue;

    #[test]
    fn test_parse_single_and_array() {
        let single = parse_records(r#"{"a": 1}"#).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0]["a"], FieldValue::Integer(1));

        let many = parse_records(r#"[{"a": "x"}, {"b": null}]"#).unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1]["b"], FieldValue::Null);
    }

    #[test]
    fn test_parse_records_rejects_scalars() {
        assert!(parse_records("42").is_err());
        let err = parse_records(r#"[{"a": 1}, 5]"#).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_parse_optional_map() {
        let map = parse_optional_map(r#"{"Lead Id": "lead_id", "Fax": null}"#).unwrap();
        assert_eq!(map["Lead Id"].as_deref(), Some("lead_id"));
        assert_eq!(map["Fax"], None);
        assert!(parse_optional_map(r#"{"Fax": 3}"#).is_err());
        assert!(parse_optional_map("[]").is_err());
    }

    #[test]
    fn test_sanitized_renames() {
        let fields = vec!["Created Time".to_string(), "Modified-By".to_string()];
        let renames = sanitized_renames(&fields);
        assert_eq!(renames["Created Time"].as_deref(), Some("created_time"));
        assert_eq!(renames["Modified-By"].as_deref(), Some("modified_by"));
    }
}
