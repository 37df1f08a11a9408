//! Schema-driven record normalization.
//!
//! Applies a per-field configuration (rename, dtype, include flag) to flat
//! records, coercing raw values into typed ones.
//!
//! # Overview
//!
//! - **Dtype registry**: resolves configuration dtype strings and hands out coercers
//! - **Coercion functions**: total, value-level conversions with documented fallbacks
//! - **Field sanitizing**: raw field names to lowercase identifiers
//! - **Module configuration**: generate raw configs and resolve them
//! - **Record operations**: coerce, rename, merge, project and filter records
//!
//! # Example
//!
//! ```
//! use recnorm_model::{FieldValue, RawConfig, Record};
//! use recnorm_normalization::{DtypeRegistry, ModuleConfigBuilder, normalize};
//!
//! let registry = DtypeRegistry::standard();
//! let raw = RawConfig::from_json_str(
//!     r#"{"Deals": {"fields": {"Amount": {"rename": "amount", "dtype": "float", "include": true}}}}"#,
//! )?;
//! let configs = ModuleConfigBuilder::new(&registry).resolve(&raw)?;
//!
//! let record: Record = [("Amount".to_string(), FieldValue::from("1.5M"))].into();
//! let normalized = normalize(&registry, &configs["Deals"], &record)?;
//! assert_eq!(normalized["amount"], FieldValue::Float(1_500_000.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Error policy
//!
//! Value coercion never fails; bad values become a fixed fallback.
//! Structural problems (missing config keys, unknown dtypes, unmapped
//! fields in strict mode) are reported as [`NormalizationError`].

mod config;
mod error;
mod record;
mod registry;
mod sanitize;

pub mod coercion;

// Registry
pub use registry::{Coercer, DtypeRegistry};

// Error type
pub use error::{NormalizationError, Result};

// Configuration
pub use config::ModuleConfigBuilder;

// Field names
pub use sanitize::sanitize_field;

// Record operations
pub use record::{
    CoerceOptions, coerce, coerce_tokens, exclude_keys, exclude_values, merge, normalize, project,
    rename,
};
