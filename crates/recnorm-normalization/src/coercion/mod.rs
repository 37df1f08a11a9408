//! Value-level coercion functions.
//!
//! Every function here is total: a value that cannot be read as the target
//! kind produces a documented fallback instead of an error.
//!
//! | dtype       | fallback                         |
//! |-------------|----------------------------------|
//! | `str`       | `""` (only `Null` has no text)   |
//! | `float`     | `0.0`                            |
//! | `int`       | `0`                              |
//! | `bool`      | `true` unless a falsy spelling   |
//! | `Timestamp` | 1900-01-01 00:00:00              |

mod boolean;
mod datetime;
mod numeric;

use recnorm_model::FieldValue;

pub use boolean::{FALSY_STRINGS, coerce_boolean, is_falsy};
pub use datetime::{coerce_timestamp, is_not_a_time, parse_timestamp, sentinel_timestamp};
pub use numeric::{
    FLOAT_FALLBACK, INTEGER_FALLBACK, coerce_float, coerce_integer, parse_currency,
    parse_dollar_letter,
};

/// Coerce to a string using the value's textual form.
pub fn coerce_string(value: &FieldValue) -> FieldValue {
    FieldValue::String(value.to_string())
}
