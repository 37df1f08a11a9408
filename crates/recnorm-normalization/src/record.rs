//! Record-level operations: coercion, renaming, merging and filtering.
//!
//! All functions are stateless and return a new record; inputs are never
//! modified.

use std::collections::BTreeMap;

use recnorm_model::{DtypeToken, FieldValue, ModuleConfig, Record};

use crate::coercion::coerce_string;
use crate::error::{NormalizationError, Result};
use crate::registry::{Coercer, DtypeRegistry};

/// How [`coerce`] treats fields it cannot map to a coercer.
#[derive(Debug, Clone, Copy)]
pub struct CoerceOptions {
    /// Applied to a field with no dtype mapping, or an unsupported dtype,
    /// when not strict.
    pub default: Coercer,
    /// Fail on missing mappings and unsupported dtypes instead of using `default`.
    pub strict: bool,
}

impl CoerceOptions {
    /// Missing mappings and unsupported dtypes are errors.
    pub fn strict() -> Self {
        Self {
            default: coerce_string,
            strict: true,
        }
    }

    /// Missing mappings and unsupported dtypes fall back to `default`.
    pub fn lenient() -> Self {
        Self {
            default: coerce_string,
            strict: false,
        }
    }

    /// Set the fallback coercer.
    #[must_use]
    pub fn with_default(mut self, default: Coercer) -> Self {
        self.default = default;
        self
    }
}

impl Default for CoerceOptions {
    fn default() -> Self {
        Self::strict()
    }
}

/// Outcome of looking up a field's coercer.
enum Lookup {
    Found(Coercer),
    Missing,
    Unsupported(String),
}

/// Coerce every field of `record` using its dtype from `dtype_map`.
///
/// In strict mode a field absent from `dtype_map` fails with
/// [`NormalizationError::MissingDtypeMapping`], and a dtype without a
/// registered coercer fails with [`NormalizationError::UnsupportedDtype`].
/// In lenient mode both cases apply `options.default` instead, so this
/// never returns an error.
pub fn coerce(
    registry: &DtypeRegistry,
    record: &Record,
    dtype_map: &BTreeMap<String, DtypeToken>,
    options: CoerceOptions,
) -> Result<Record> {
    coerce_with(record, options, |field| match dtype_map.get(field) {
        None => Lookup::Missing,
        Some(dtype) => registry
            .coercer_for(*dtype)
            .map_or_else(|| Lookup::Unsupported(dtype.to_string()), Lookup::Found),
    })
}

/// Like [`coerce`], with the dtype map holding configuration strings
/// (`"int"`, `"DateTime"`, `"NA"`, ...). Strings the registry cannot resolve
/// count as unsupported dtypes.
pub fn coerce_tokens(
    registry: &DtypeRegistry,
    record: &Record,
    dtype_map: &BTreeMap<String, String>,
    options: CoerceOptions,
) -> Result<Record> {
    coerce_with(record, options, |field| match dtype_map.get(field) {
        None => Lookup::Missing,
        Some(token) => registry
            .resolve(token)
            .ok()
            .and_then(|dtype| registry.coercer_for(dtype))
            .map_or_else(|| Lookup::Unsupported(token.clone()), Lookup::Found),
    })
}

fn coerce_with<F>(record: &Record, options: CoerceOptions, lookup: F) -> Result<Record>
where
    F: Fn(&str) -> Lookup,
{
    let mut coerced = Record::new();
    for (field, value) in record {
        let coercer = match lookup(field) {
            Lookup::Found(coercer) => coercer,
            Lookup::Missing if options.strict => {
                return Err(NormalizationError::MissingDtypeMapping {
                    field: field.clone(),
                });
            }
            Lookup::Unsupported(dtype) if options.strict => {
                return Err(NormalizationError::UnsupportedDtype {
                    field: field.clone(),
                    dtype,
                });
            }
            Lookup::Missing => {
                tracing::debug!(
                    field = %field,
                    kind = value.kind(),
                    "No dtype mapped; using default coercer"
                );
                options.default
            }
            Lookup::Unsupported(dtype) => {
                tracing::debug!(
                    field = %field,
                    dtype = %dtype,
                    kind = value.kind(),
                    "Unsupported dtype; using default coercer"
                );
                options.default
            }
        };
        coerced.insert(field.clone(), coercer(value));
    }
    Ok(coerced)
}

/// Rename fields per `rename_map`. Unmapped fields keep their name.
///
/// Records are visited in sorted key order, so when two fields land on the
/// same name the one whose source name sorts last wins, regardless of the
/// order the producer emitted them in.
pub fn rename(record: &Record, rename_map: &BTreeMap<String, String>) -> Record {
    record
        .iter()
        .map(|(field, value)| {
            let name = rename_map.get(field).unwrap_or(field);
            (name.clone(), value.clone())
        })
        .collect()
}

/// Merge records left to right; later records win on conflicting keys.
pub fn merge<'a, I>(records: I) -> Record
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().fold(Record::new(), |mut merged, record| {
        merged.extend(record.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    })
}

/// Keep only the fields named in `keys`.
pub fn project<S: AsRef<str>>(record: &Record, keys: &[S]) -> Record {
    filter_fields(record, |field, _| contains_key(keys, field))
}

/// Drop the fields named in `keys`.
pub fn exclude_keys<S: AsRef<str>>(record: &Record, keys: &[S]) -> Record {
    filter_fields(record, |field, _| !contains_key(keys, field))
}

/// Drop the fields whose value equals one of `values`.
pub fn exclude_values(record: &Record, values: &[FieldValue]) -> Record {
    filter_fields(record, |_, value| !values.contains(value))
}

fn contains_key<S: AsRef<str>>(keys: &[S], field: &str) -> bool {
    keys.iter().any(|key| key.as_ref() == field)
}

fn filter_fields<F>(record: &Record, keep: F) -> Record
where
    F: Fn(&str, &FieldValue) -> bool,
{
    record
        .iter()
        .filter(|(field, value)| keep(field, value))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect()
}

/// Apply a resolved module configuration to a raw record.
///
/// Keeps the included fields, coerces each one with its configured dtype,
/// then renames them to their targets.
pub fn normalize(registry: &DtypeRegistry, config: &ModuleConfig, record: &Record) -> Result<Record> {
    let included: Vec<String> = config.included_fields().into_iter().collect();
    let projected = project(record, &included);
    let coerced = coerce(registry, &projected, &config.dtype_map(), CoerceOptions::strict())?;
    Ok(rename(&coerced, &config.rename_map()))
}
