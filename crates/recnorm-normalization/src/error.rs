//! Error types for configuration resolution and record coercion.
//!
//! Only structural problems surface here. Malformed values inside a record
//! never produce an error; coercion functions fall back to a sentinel.

use thiserror::Error;

/// Errors raised by configuration resolution and strict record coercion.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum NormalizationError {
    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// A field entry lacks one of `rename`, `dtype`, `include`.
    #[error("field '{field}' missing required key '{key}'; module is {module}")]
    MissingConfigKey {
        module: String,
        field: String,
        key: String,
    },

    /// A module entry has no `fields` section.
    #[error("module {module} has no 'fields' section")]
    MissingFieldsSection { module: String },

    /// A field entry holds a value of the wrong JSON type.
    #[error("field '{field}' has an invalid '{key}' value: {reason}; module is {module}")]
    InvalidConfigValue {
        module: String,
        field: String,
        key: String,
        reason: String,
    },

    /// A field's dtype string is neither a registered alias nor a null-token.
    #[error("field '{field}' has an invalid dtype: '{token}'; module is {module}")]
    UnknownDtype {
        module: String,
        field: String,
        token: String,
    },

    /// A dtype string could not be resolved outside of any configuration.
    #[error("unknown dtype '{token}'")]
    UnknownDtypeToken { token: String },

    // =========================================================================
    // STRICT COERCION ERRORS
    // =========================================================================
    /// A record field has no entry in the dtype map.
    #[error("no dtype mapped for field '{field}'")]
    MissingDtypeMapping { field: String },

    /// A record field maps to a dtype the registry cannot coerce.
    #[error("dtype '{dtype}' is unsupported (field '{field}')")]
    UnsupportedDtype { field: String, dtype: String },
}

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_names_field_key_and_module() {
        let err = NormalizationError::MissingConfigKey {
            module: "Leads".to_string(),
            field: "Email".to_string(),
            key: "dtype".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "field 'Email' missing required key 'dtype'; module is Leads"
        );
    }

    #[test]
    fn test_unknown_dtype_display() {
        let err = NormalizationError::UnknownDtype {
            module: "Leads".to_string(),
            field: "Email".to_string(),
            token: "varchar".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "field 'Email' has an invalid dtype: 'varchar'; module is Leads"
        );
    }
}
