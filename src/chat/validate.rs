//! Field-syntax checks for chat input.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("mobile pattern compiles"));

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Exactly ten ASCII digits.
pub fn validate_mobile(mobile: &str) -> bool {
    MOBILE_RE.is_match(mobile)
}

/// Shape check only; serviceability is the backend's call.
pub fn validate_postcode(postcode: &str) -> bool {
    postcode.trim().chars().count() >= 5
}

/// At least two characters, all alphabetic.
pub fn validate_name(name: &str) -> bool {
    let name = name.trim();
    name.chars().count() >= 2 && name.chars().all(char::is_alphabetic)
}

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let bytes = date.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

pub fn validate_date(date: &str) -> bool {
    parse_date(date).is_some()
}

/// Whether `date` is today or later, in local time.
pub fn validate_future_date(date: &str) -> bool {
    validate_future_date_on(date, Local::now().date_naive())
}

/// Whether `date` falls on or after `today`.
pub fn validate_future_date_on(date: &str, today: NaiveDate) -> bool {
    parse_date(date).is_some_and(|d| d >= today)
}
