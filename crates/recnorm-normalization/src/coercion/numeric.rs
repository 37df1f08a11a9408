//! Numeric coercion with dollar-letter suffixes.
//!
//! Exchange and CRM payloads carry amounts like `"1.5M"`, `"2B"`, `"12%"`
//! or `"$2.5M"`. A trailing `M`/`B` (any case) scales by 10^6 / 10^9.

use recnorm_model::FieldValue;

const MILLION: f64 = 1_000_000.0;
const BILLION: f64 = 1_000_000_000.0;

/// Value produced by [`coerce_float`] when the input is not a number.
pub const FLOAT_FALLBACK: f64 = 0.0;

/// Value produced by [`coerce_integer`] when the input is not a number.
pub const INTEGER_FALLBACK: i64 = 0;

/// Parse a number that may end in a dollar-letter suffix.
///
/// When the last character is not a digit it is dropped before parsing;
/// `M` and `B` additionally scale the result. Any other trailing
/// non-digit is dropped without scaling (`"5."` parses as `5.0`).
///
/// Returns None if the remainder is not a number.
pub fn parse_dollar_letter(value: &str) -> Option<f64> {
    let value = value.trim();
    let last = value.chars().next_back()?;

    if last.is_ascii_digit() {
        return value.parse().ok();
    }

    let number: f64 = value[..value.len() - last.len_utf8()].trim().parse().ok()?;
    match last.to_ascii_uppercase() {
        'M' => Some(number * MILLION),
        'B' => Some(number * BILLION),
        _ => Some(number),
    }
}

/// Parse a currency amount: a leading `$` is dropped, then the dollar-letter
/// rules of [`parse_dollar_letter`] apply.
pub fn parse_currency(value: &str) -> Option<f64> {
    let value = value.trim();
    parse_dollar_letter(value.strip_prefix('$').unwrap_or(value))
}

/// Coerce to a float. Percent signs are ignored; failure yields [`FLOAT_FALLBACK`].
pub fn coerce_float(value: &FieldValue) -> FieldValue {
    let text = value.to_string().replace('%', "");
    FieldValue::Float(parse_dollar_letter(&text).unwrap_or(FLOAT_FALLBACK))
}

/// Coerce to an integer by truncating the parsed number.
///
/// Percent and dollar signs are ignored anywhere in the input. Plain integer
/// text is read exactly; anything else goes through [`parse_dollar_letter`]
/// and is truncated. Failure, or a result outside the `i64` range, yields
/// [`INTEGER_FALLBACK`].
pub fn coerce_integer(value: &FieldValue) -> FieldValue {
    let text = value.to_string().replace(['%', '$'], "");
    if let Ok(exact) = text.trim().parse::<i64>() {
        return FieldValue::Integer(exact);
    }
    let number = parse_dollar_letter(&text).and_then(truncate_to_i64);
    FieldValue::Integer(number.unwrap_or(INTEGER_FALLBACK))
}

fn truncate_to_i64(number: f64) -> Option<i64> {
    let truncated = number.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_dollar_letter("5"), Some(5.0));
        assert_eq!(parse_dollar_letter("-45.67"), Some(-45.67));
        assert_eq!(parse_dollar_letter("  123  "), Some(123.0));
        assert_eq!(parse_dollar_letter("1.23e5"), Some(123000.0));
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(parse_dollar_letter("1.5M"), Some(1_500_000.0));
        assert_eq!(parse_dollar_letter("1.5m"), Some(1_500_000.0));
        assert_eq!(parse_dollar_letter("2B"), Some(2_000_000_000.0));
        assert_eq!(parse_dollar_letter("3 b"), Some(3_000_000_000.0));
        assert_eq!(parse_dollar_letter("5."), Some(5.0));
        assert_eq!(parse_dollar_letter("7k"), Some(7.0));
    }

    #[test]
    fn test_invalid() {
        assert_eq!(parse_dollar_letter("abc"), None);
        assert_eq!(parse_dollar_letter(""), None);
        assert_eq!(parse_dollar_letter("M"), None);
        assert_eq!(parse_dollar_letter("$5"), None);
        assert_eq!(parse_dollar_letter("12.34.56"), None);
    }

    #[test]
    fn test_currency() {
        assert_eq!(parse_currency("$2.5M"), Some(2_500_000.0));
        assert_eq!(parse_currency(" $10 "), Some(10.0));
        assert_eq!(parse_currency("10"), Some(10.0));
        assert_eq!(parse_currency("$"), None);
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(coerce_float(&"1.5M".into()), FieldValue::Float(1_500_000.0));
        assert_eq!(coerce_float(&" 12.5% ".into()), FieldValue::Float(12.5));
        assert_eq!(coerce_float(&"abc".into()), FieldValue::Float(0.0));
        assert_eq!(coerce_float(&"$5".into()), FieldValue::Float(0.0));
        assert_eq!(coerce_float(&FieldValue::Integer(3)), FieldValue::Float(3.0));
        assert_eq!(coerce_float(&FieldValue::Float(0.25)), FieldValue::Float(0.25));
        assert_eq!(coerce_float(&FieldValue::Null), FieldValue::Float(0.0));
        assert_eq!(coerce_float(&FieldValue::Boolean(true)), FieldValue::Float(0.0));
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce_integer(&"$2.5M".into()), FieldValue::Integer(2_500_000));
        assert_eq!(coerce_integer(&"42%".into()), FieldValue::Integer(42));
        assert_eq!(coerce_integer(&"9.99".into()), FieldValue::Integer(9));
        assert_eq!(coerce_integer(&"-9.99".into()), FieldValue::Integer(-9));
        assert_eq!(coerce_integer(&"abc".into()), FieldValue::Integer(0));
        assert_eq!(coerce_integer(&"".into()), FieldValue::Integer(0));
        assert_eq!(coerce_integer(&"nan".into()), FieldValue::Integer(0));
        assert_eq!(coerce_integer(&"1e30".into()), FieldValue::Integer(0));
        assert_eq!(
            coerce_integer(&"1706004000002464015".into()),
            FieldValue::Integer(1_706_004_000_002_464_015)
        );
    }
}
