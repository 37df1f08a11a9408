//! Data model for record normalization.
//!
//! # Module Organization
//!
//! - [`dtype`]: canonical dtype tokens, their aliases, and null-tokens
//! - [`value`]: scalar field values and flat records
//! - [`tree`]: tagged values produced from XML documents
//! - [`config`]: raw and resolved module configuration

pub mod config;
pub mod dtype;
pub mod error;
pub mod tree;
pub mod value;

pub use config::{
    DTYPE_KEY, FIELDS_KEY, FieldConfig, INCLUDE_KEY, ModuleConfig, REQUIRED_FIELD_KEYS, RENAME_KEY,
    RawConfig, RawFieldConfig, RawModuleConfig,
};
pub use dtype::{DtypeToken, NULL_TOKENS, is_null_token};
pub use error::{ModelError, Result};
pub use tree::{XmlMapping, XmlValue};
pub use value::{FieldValue, Record, record_from_json};
