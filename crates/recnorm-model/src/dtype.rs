//! Canonical dtype tokens and the null-token vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder strings that mean "no value configured".
///
/// An absent value (`None`) is treated the same way; see [`is_null_token`].
pub const NULL_TOKENS: [&str; 3] = ["NA", "None", "null"];

/// Returns true if `value` is absent or one of [`NULL_TOKENS`].
///
/// Matching is exact and case-sensitive.
pub fn is_null_token(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(token) => NULL_TOKENS.contains(&token),
    }
}

/// One of the five canonical value kinds a field can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DtypeToken {
    #[serde(rename = "str")]
    String,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "int")]
    Integer,
    #[serde(rename = "bool")]
    Boolean,
    #[serde(rename = "Timestamp")]
    Timestamp,
}

impl DtypeToken {
    /// Every token, in declaration order.
    pub const ALL: [DtypeToken; 5] = [
        DtypeToken::String,
        DtypeToken::Float,
        DtypeToken::Integer,
        DtypeToken::Boolean,
        DtypeToken::Timestamp,
    ];

    /// The name written into generated configurations.
    pub fn display_name(self) -> &'static str {
        match self {
            DtypeToken::String => "str",
            DtypeToken::Float => "float",
            DtypeToken::Integer => "int",
            DtypeToken::Boolean => "bool",
            DtypeToken::Timestamp => "Timestamp",
        }
    }

    /// Accepted configuration strings for this token. The display name is always first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            DtypeToken::String => &["str"],
            DtypeToken::Float => &["float"],
            DtypeToken::Integer => &["int"],
            DtypeToken::Boolean => &["bool"],
            DtypeToken::Timestamp => &["Timestamp", "DateTime", "datetime"],
        }
    }

    /// Looks up a token by one of its aliases (case-sensitive).
    pub fn from_alias(alias: &str) -> Option<DtypeToken> {
        Self::ALL
            .into_iter()
            .find(|token| token.aliases().contains(&alias))
    }
}

impl AsRef<str> for DtypeToken {
    fn as_ref(&self) -> &str {
        self.display_name()
    }
}

impl fmt::Display for DtypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
