//! Module configuration: the raw serde shape and the resolved form.
//!
//! A raw configuration is what gets written to and read from disk:
//!
//! ```json
//! {
//!   "Accounts": {
//!     "fields": {
//!       "Created Time": { "rename": "created_time", "dtype": "Timestamp", "include": true }
//!     }
//!   }
//! }
//! ```
//!
//! Field entries stay loose JSON maps so that resolution can report exactly
//! which key is missing. A [`ModuleConfig`] is the resolved form, with every
//! dtype mapped onto a [`DtypeToken`].

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dtype::DtypeToken;
use crate::error::{ModelError, Result};

pub const FIELDS_KEY: &str = "fields";
pub const RENAME_KEY: &str = "rename";
pub const DTYPE_KEY: &str = "dtype";
pub const INCLUDE_KEY: &str = "include";

/// The keys every raw field entry must carry, in the order they are checked.
pub const REQUIRED_FIELD_KEYS: [&str; 3] = [RENAME_KEY, DTYPE_KEY, INCLUDE_KEY];

/// A raw field entry: `{ "rename": ..., "dtype": ..., "include": ... }`.
pub type RawFieldConfig = serde_json::Map<String, serde_json::Value>;

/// A raw module entry. `fields` is optional here so that a missing section
/// is reported during resolution rather than as a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawModuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, RawFieldConfig>>,
}

impl RawModuleConfig {
    pub fn with_fields(fields: BTreeMap<String, RawFieldConfig>) -> Self {
        Self {
            fields: Some(fields),
        }
    }
}

/// A raw configuration document: module name to module entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawConfig {
    pub modules: BTreeMap<String, RawModuleConfig>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration document from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ModelError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ModelError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn module(&self, name: &str) -> Option<&RawModuleConfig> {
        self.modules.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, module: RawModuleConfig) {
        self.modules.insert(name.into(), module);
    }

    /// Moves every module of `other` into `self`, replacing same-named modules.
    pub fn merge(&mut self, other: RawConfig) {
        self.modules.extend(other.modules);
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Resolved configuration of a single source field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field name as it appears in raw records.
    pub source_name: String,
    /// Output field name. `None` when the raw entry held a null-token.
    pub rename_target: Option<String>,
    pub dtype: DtypeToken,
    /// Whether the field survives [`ModuleConfig`]-driven normalization.
    pub include: bool,
}

impl FieldConfig {
    /// Output name: the rename target, or the source name when there is none.
    pub fn target_name(&self) -> &str {
        self.rename_target.as_deref().unwrap_or(&self.source_name)
    }
}

/// Resolved configuration of one module (data source).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub module_name: String,
    pub fields: BTreeMap<String, FieldConfig>,
}

impl ModuleConfig {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, field: FieldConfig) {
        self.fields.insert(field.source_name.clone(), field);
    }

    pub fn field(&self, source_name: &str) -> Option<&FieldConfig> {
        self.fields.get(source_name)
    }

    /// Source field name to dtype, for every configured field.
    pub fn dtype_map(&self) -> BTreeMap<String, DtypeToken> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.dtype))
            .collect()
    }

    /// Source field name to output name, for fields that have a rename target.
    pub fn rename_map(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|(name, field)| {
                field
                    .rename_target
                    .as_ref()
                    .map(|target| (name.clone(), target.clone()))
            })
            .collect()
    }

    /// Source names of the fields flagged for inclusion.
    pub fn included_fields(&self) -> BTreeSet<String> {
        self.fields
            .values()
            .filter(|field| field.include)
            .map(|field| field.source_name.clone())
            .collect()
    }
}
