//! Date extraction from listed object keys.
//!
//! Only the trailing path segment of a key is inspected; a key contributes
//! a date iff that segment contains a valid `YYYY-MM-DD` substring.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("date pattern compiles"))
}

/// True iff `value` is exactly a valid `YYYY-MM-DD` calendar date.
pub(crate) fn is_valid_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Extract the date contributed by a listed key, if any.
///
/// Candidates that match the shape but are not real calendar dates
/// (month 13, February 30th) are rejected.
pub(crate) fn date_from_key(key: &str) -> Option<String> {
    let segment = key.rsplit('/').next().unwrap_or(key);
    date_pattern()
        .find_iter(segment)
        .map(|m| m.as_str())
        .find(|candidate| is_valid_date(candidate))
        .map(str::to_string)
}
