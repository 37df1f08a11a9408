//! Building and resolving module configurations.

use std::collections::BTreeMap;

use serde_json::Value;

use recnorm_model::{
    DTYPE_KEY, DtypeToken, FieldConfig, INCLUDE_KEY, ModuleConfig, REQUIRED_FIELD_KEYS,
    RENAME_KEY, RawConfig, RawFieldConfig, RawModuleConfig, is_null_token,
};

use crate::error::{NormalizationError, Result};
use crate::registry::DtypeRegistry;

/// Builds raw module configurations and resolves them against a [`DtypeRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct ModuleConfigBuilder<'a> {
    registry: &'a DtypeRegistry,
}

impl<'a> ModuleConfigBuilder<'a> {
    pub fn new(registry: &'a DtypeRegistry) -> Self {
        Self { registry }
    }

    /// Generate a raw configuration for one module.
    ///
    /// `renames` drives iteration: fields that only appear in `dtypes` are
    /// left out. A field without a dtype, or whose rename target is a
    /// null-token, is written with `include: false` and dtype `str`.
    /// Otherwise the dtype string is stored as given, unresolved.
    pub fn build<R, D>(
        module_name: &str,
        renames: &BTreeMap<String, Option<R>>,
        dtypes: &BTreeMap<String, Option<D>>,
    ) -> RawConfig
    where
        R: AsRef<str>,
        D: AsRef<str>,
    {
        let fields = renames
            .iter()
            .map(|(field, rename)| {
                let rename: Option<&str> = rename.as_ref().map(|name| name.as_ref());
                let dtype: Option<&str> = dtypes
                    .get(field)
                    .and_then(Option::as_ref)
                    .map(|dtype| dtype.as_ref());
                let entry = match dtype {
                    Some(dtype) if !is_null_token(rename) => field_entry(rename, dtype, true),
                    _ => field_entry(rename, DtypeToken::String.display_name(), false),
                };
                (field.clone(), entry)
            })
            .collect();

        let mut config = RawConfig::new();
        config.insert(module_name, RawModuleConfig::with_fields(fields));
        config
    }

    /// Validate a raw configuration and resolve every dtype string.
    ///
    /// Each field entry must carry `rename`, `dtype` and `include`. Null-token
    /// dtypes resolve to [`DtypeToken::String`]. A field whose rename target
    /// or dtype is a null-token is never included, whatever its `include`
    /// flag says.
    /// The input is left untouched.
    pub fn resolve(&self, raw: &RawConfig) -> Result<BTreeMap<String, ModuleConfig>> {
        raw.modules
            .iter()
            .map(|(module, data)| {
                let resolved = self.resolve_module(module, data)?;
                Ok((module.clone(), resolved))
            })
            .collect()
    }

    /// Resolve a single module entry.
    pub fn resolve_module(&self, module: &str, data: &RawModuleConfig) -> Result<ModuleConfig> {
        let fields = data
            .fields
            .as_ref()
            .ok_or_else(|| NormalizationError::MissingFieldsSection {
                module: module.to_string(),
            })?;

        let mut config = ModuleConfig::new(module);
        for (field, info) in fields {
            config.insert(self.resolve_field(module, field, info)?);
        }
        tracing::debug!(module, fields = config.fields.len(), "Resolved module config");
        Ok(config)
    }

    fn resolve_field(&self, module: &str, field: &str, info: &RawFieldConfig) -> Result<FieldConfig> {
        for key in REQUIRED_FIELD_KEYS {
            if !info.contains_key(key) {
                return Err(NormalizationError::MissingConfigKey {
                    module: module.to_string(),
                    field: field.to_string(),
                    key: key.to_string(),
                });
            }
        }
        let invalid = |key: &str, reason: &str| NormalizationError::InvalidConfigValue {
            module: module.to_string(),
            field: field.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        };

        let rename_target = optional_string(&info[RENAME_KEY])
            .ok_or_else(|| invalid(RENAME_KEY, "expected a string or null"))?;
        let dtype_token = optional_string(&info[DTYPE_KEY])
            .ok_or_else(|| invalid(DTYPE_KEY, "expected a string or null"))?;
        let include = info[INCLUDE_KEY]
            .as_bool()
            .ok_or_else(|| invalid(INCLUDE_KEY, "expected a boolean"))?;

        let dtype = self
            .registry
            .resolve_optional(dtype_token.as_deref())
            .map_err(|_| NormalizationError::UnknownDtype {
                module: module.to_string(),
                field: field.to_string(),
                token: dtype_token.clone().unwrap_or_default(),
            })?;

        let null_rename = is_null_token(rename_target.as_deref());
        let null_dtype = is_null_token(dtype_token.as_deref());
        if include && (null_rename || null_dtype) {
            tracing::warn!(
                module,
                field,
                null_rename,
                null_dtype,
                "Field has a null rename target or dtype but include=true; excluding it"
            );
        }

        Ok(FieldConfig {
            source_name: field.to_string(),
            rename_target: rename_target.filter(|_| !null_rename),
            dtype,
            include: include && !null_rename && !null_dtype,
        })
    }
}

fn field_entry(rename: Option<&str>, dtype: &str, include: bool) -> RawFieldConfig {
    let mut entry = RawFieldConfig::new();
    entry.insert(
        RENAME_KEY.to_string(),
        rename.map_or(Value::Null, |name| Value::String(name.to_string())),
    );
    entry.insert(DTYPE_KEY.to_string(), Value::String(dtype.to_string()));
    entry.insert(INCLUDE_KEY.to_string(), Value::Bool(include));
    entry
}

/// `Some(None)` for JSON null, `Some(Some(text))` for a string, `None` otherwise.
fn optional_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(text) => Some(Some(text.clone())),
        _ => None,
    }
}
