//! Timestamp coercion with a fixed sentinel fallback.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use recnorm_model::FieldValue;

/// Date/time layouts tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%d %b %Y %H:%M:%S",
];

/// Layouts with an explicit UTC offset; the result is converted to UTC.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Date-only layouts; the result is midnight of that day.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Spellings of "not a time" (compared case-insensitively after trimming).
const NOT_A_TIME: [&str; 5] = ["nat", "nan", "none", "null", ""];

/// The timestamp substituted for anything that is not a valid time: 1900-01-01 00:00:00.
pub fn sentinel_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1900, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Returns true if `value` spells a missing time (`NaT`, `nan`, `None`, empty, ...).
pub fn is_not_a_time(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    NOT_A_TIME.contains(&normalized.as_str())
}

/// Parse a calendar timestamp.
///
/// Handles RFC 3339, `YYYY-MM-DD[ T]HH:MM[:SS[.fff]]` with or without a UTC
/// offset, US-style `MM/DD/YYYY` and a few textual month layouts. Offsets
/// are normalized to UTC. Returns None for anything else, including the
/// not-a-time spellings.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if is_not_a_time(value) {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Some(parsed.naive_utc());
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Interpret an integer as nanoseconds since the Unix epoch.
fn from_epoch_nanos(nanos: i64) -> Option<NaiveDateTime> {
    let secs = nanos.div_euclid(1_000_000_000);
    let subsec = u32::try_from(nanos.rem_euclid(1_000_000_000)).ok()?;
    DateTime::<Utc>::from_timestamp(secs, subsec).map(|dt| dt.naive_utc())
}

/// Coerce to a timestamp. Never fails: unparseable input and not-a-time
/// spellings both yield [`sentinel_timestamp`].
///
/// Integers (and finite floats, truncated) count nanoseconds since the Unix epoch.
pub fn coerce_timestamp(value: &FieldValue) -> FieldValue {
    let parsed = match value {
        FieldValue::Timestamp(ts) => Some(*ts),
        FieldValue::String(text) => parse_timestamp(text),
        FieldValue::Integer(nanos) => from_epoch_nanos(*nanos),
        FieldValue::Float(nanos) if nanos.is_finite() => from_epoch_nanos(nanos.trunc() as i64),
        FieldValue::Float(_) | FieldValue::Boolean(_) | FieldValue::Null => None,
    };
    FieldValue::Timestamp(parsed.unwrap_or_else(sentinel_timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_sentinel() {
        assert_eq!(sentinel_timestamp(), ts(1900, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(parse_timestamp("2016-09-26"), Some(ts(2016, 9, 26, 0, 0, 0)));
    }

    #[test]
    fn test_iso_datetime() {
        assert_eq!(
            parse_timestamp("2016-09-26 16:15:32"),
            Some(ts(2016, 9, 26, 16, 15, 32))
        );
        assert_eq!(
            parse_timestamp("2016-09-26T16:15:32"),
            Some(ts(2016, 9, 26, 16, 15, 32))
        );
        assert_eq!(
            parse_timestamp("2016-09-26 16:15"),
            Some(ts(2016, 9, 26, 16, 15, 0))
        );
    }

    #[test]
    fn test_fractional_seconds() {
        let parsed = parse_timestamp("2017-12-01T10:00:00.250").unwrap();
        assert_eq!(parsed.and_utc().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_offsets_normalize_to_utc() {
        assert_eq!(
            parse_timestamp("2017-12-01T10:00:00+02:00"),
            Some(ts(2017, 12, 1, 8, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2017-12-01T10:00:00Z"),
            Some(ts(2017, 12, 1, 10, 0, 0))
        );
    }

    #[test]
    fn test_us_and_textual_dates() {
        assert_eq!(parse_timestamp("09/26/2016"), Some(ts(2016, 9, 26, 0, 0, 0)));
        assert_eq!(parse_timestamp("26 Sep 2016"), Some(ts(2016, 9, 26, 0, 0, 0)));
        assert_eq!(parse_timestamp("Sep 26, 2016"), Some(ts(2016, 9, 26, 0, 0, 0)));
    }

    #[test]
    fn test_invalid_and_not_a_time() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2016-13-45"), None);
        assert_eq!(parse_timestamp("NaT"), None);
        assert!(is_not_a_time(" nat "));
        assert!(!is_not_a_time("2016-09-26"));
    }

    #[test]
    fn test_coerce_falls_back_to_sentinel() {
        let sentinel = FieldValue::Timestamp(sentinel_timestamp());
        assert_eq!(coerce_timestamp(&"garbage".into()), sentinel);
        assert_eq!(coerce_timestamp(&"NaT".into()), sentinel);
        assert_eq!(coerce_timestamp(&"".into()), sentinel);
        assert_eq!(coerce_timestamp(&FieldValue::Null), sentinel);
        assert_eq!(coerce_timestamp(&FieldValue::Boolean(true)), sentinel);
        assert_eq!(coerce_timestamp(&FieldValue::Float(f64::NAN)), sentinel);
    }

    #[test]
    fn test_coerce_valid_values() {
        assert_eq!(
            coerce_timestamp(&"2016-09-26".into()),
            FieldValue::Timestamp(ts(2016, 9, 26, 0, 0, 0))
        );
        let existing = ts(2020, 2, 29, 12, 0, 0);
        assert_eq!(
            coerce_timestamp(&FieldValue::Timestamp(existing)),
            FieldValue::Timestamp(existing)
        );
        assert_eq!(
            coerce_timestamp(&FieldValue::Integer(1_500_000_000_000_000_000)),
            FieldValue::Timestamp(ts(2017, 7, 14, 2, 40, 0))
        );
        assert_eq!(
            coerce_timestamp(&FieldValue::Integer(-1)),
            FieldValue::Timestamp(
                ts(1969, 12, 31, 23, 59, 59) + chrono::Duration::nanoseconds(999_999_999)
            )
        );
    }
}
