//! Boolean coercion against a fixed falsy vocabulary.

use recnorm_model::FieldValue;

/// Lowercased, trimmed spellings that coerce to `false`. Everything else is `true`.
pub const FALSY_STRINGS: [&str; 9] = ["no", "false", "null", "", "none", "na", "nan", "nat", "0"];

/// Returns true if `value` is a falsy spelling (case and surrounding whitespace ignored).
pub fn is_falsy(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    FALSY_STRINGS.contains(&normalized.as_str())
}

/// Coerce to a boolean. Never fails: unknown spellings are `true`.
pub fn coerce_boolean(value: &FieldValue) -> FieldValue {
    FieldValue::Boolean(!is_falsy(&value.to_string()))
}
