//! Field-name sanitizing.

/// Separators replaced with `_`, applied as sequential passes in this order.
const SEPARATORS: [&str; 4] = ["-", " ", "___", "__"];

/// Normalize a raw field name into a lowercase identifier.
///
/// Each separator pass runs once over the result of the previous one, so
/// long runs are only partly collapsed: `"a-----b"` becomes `"a__b"`.
/// After the passes, anything that is not alphanumeric or `_` is dropped.
pub fn sanitize_field(field: &str) -> String {
    let replaced = SEPARATORS
        .iter()
        .fold(field.to_string(), |name, separator| name.replace(separator, "_"));
    replaced
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_lowercase()
}
