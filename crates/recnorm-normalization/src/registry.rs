//! Dtype registry: token resolution and coercion lookup.

use std::collections::BTreeMap;

use recnorm_model::{DtypeToken, FieldValue, is_null_token};

use crate::coercion::{
    coerce_boolean, coerce_float, coerce_integer, coerce_string, coerce_timestamp,
};
use crate::error::{NormalizationError, Result};

/// A total value-level coercion function.
pub type Coercer = fn(&FieldValue) -> FieldValue;

/// Maps dtype tokens to coercion functions.
///
/// Build one with [`DtypeRegistry::standard`] at startup and pass it by
/// reference. There is no `&mut` API: a registry is immutable once built,
/// so it can be shared across threads freely.
#[derive(Debug, Clone)]
pub struct DtypeRegistry {
    coercers: BTreeMap<DtypeToken, Coercer>,
}

impl DtypeRegistry {
    /// A registry with a coercer for every [`DtypeToken`].
    pub fn standard() -> Self {
        Self::empty()
            .with_coercer(DtypeToken::String, coerce_string)
            .with_coercer(DtypeToken::Float, coerce_float)
            .with_coercer(DtypeToken::Integer, coerce_integer)
            .with_coercer(DtypeToken::Boolean, coerce_boolean)
            .with_coercer(DtypeToken::Timestamp, coerce_timestamp)
    }

    /// A registry with no coercers. Nothing resolves against it.
    pub fn empty() -> Self {
        Self {
            coercers: BTreeMap::new(),
        }
    }

    /// Register (or replace) the coercer for `token`.
    #[must_use]
    pub fn with_coercer(mut self, token: DtypeToken, coercer: Coercer) -> Self {
        self.coercers.insert(token, coercer);
        self
    }

    /// Returns true if `token` has a coercer.
    pub fn supports(&self, token: DtypeToken) -> bool {
        self.coercers.contains_key(&token)
    }

    /// Tokens with a registered coercer.
    pub fn tokens(&self) -> impl Iterator<Item = DtypeToken> + '_ {
        self.coercers.keys().copied()
    }

    /// Resolve a configuration dtype string.
    ///
    /// Registered aliases map to their token; null-tokens (`NA`, `None`,
    /// `null`) map to [`DtypeToken::String`]. A token without a coercer is
    /// treated as unknown.
    pub fn resolve(&self, token: &str) -> Result<DtypeToken> {
        let resolved = DtypeToken::from_alias(token).or_else(|| {
            is_null_token(Some(token)).then_some(DtypeToken::String)
        });
        match resolved {
            Some(dtype) if self.supports(dtype) => Ok(dtype),
            _ => Err(NormalizationError::UnknownDtypeToken {
                token: token.to_string(),
            }),
        }
    }

    /// Like [`resolve`](Self::resolve), with an absent token treated as a null-token.
    pub fn resolve_optional(&self, token: Option<&str>) -> Result<DtypeToken> {
        self.resolve(token.unwrap_or(NULL_TOKEN))
    }

    /// The coercion function for `dtype`, if registered.
    pub fn coercer_for(&self, dtype: DtypeToken) -> Option<Coercer> {
        self.coercers.get(&dtype).copied()
    }

    /// Coerce `value` as `dtype`. Returns None if `dtype` has no coercer.
    pub fn coerce(&self, dtype: DtypeToken, value: &FieldValue) -> Option<FieldValue> {
        self.coercer_for(dtype).map(|coercer| coercer(value))
    }
}

impl Default for DtypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

const NULL_TOKEN: &str = "None";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_aliases() {
        let registry = DtypeRegistry::standard();
        assert_eq!(registry.resolve("str"), Ok(DtypeToken::String));
        assert_eq!(registry.resolve("float"), Ok(DtypeToken::Float));
        assert_eq!(registry.resolve("int"), Ok(DtypeToken::Integer));
        assert_eq!(registry.resolve("bool"), Ok(DtypeToken::Boolean));
        assert_eq!(registry.resolve("DateTime"), Ok(DtypeToken::Timestamp));
    }

    #[test]
    fn test_resolve_null_tokens() {
        let registry = DtypeRegistry::standard();
        for token in ["NA", "None", "null"] {
            assert_eq!(registry.resolve(token), Ok(DtypeToken::String));
        }
        assert_eq!(registry.resolve_optional(None), Ok(DtypeToken::String));
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = DtypeRegistry::standard();
        assert_eq!(
            registry.resolve("varchar"),
            Err(NormalizationError::UnknownDtypeToken {
                token: "varchar".to_string()
            })
        );
        assert!(registry.resolve("STR").is_err());
    }

    #[test]
    fn test_partial_registry() {
        let registry = DtypeRegistry::empty().with_coercer(DtypeToken::String, coerce_string);
        assert!(registry.resolve("int").is_err());
        assert_eq!(registry.resolve("null"), Ok(DtypeToken::String));
        assert!(registry.coercer_for(DtypeToken::Integer).is_none());
        assert_eq!(registry.tokens().collect::<Vec<_>>(), vec![DtypeToken::String]);
    }

    #[test]
    fn test_standard_is_total() {
        let registry = DtypeRegistry::default();
        for token in DtypeToken::ALL {
            assert!(registry.coercer_for(token).is_some(), "{token}");
        }
        assert_eq!(
            registry.coerce(DtypeToken::Integer, &"7".into()),
            Some(FieldValue::Integer(7))
        );
    }
}
