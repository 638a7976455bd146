//! Display formatting for aggregated user records.
//!
//! Stored values are inconsistent across app versions, so every formatter
//! degrades to [`NOT_AVAILABLE`] instead of failing.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;

use spot_my_ride_core::Platform;

use crate::models::RawDate;

/// Placeholder for missing or unparseable values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Console timezone suffix: `" UTC"`, `" UTC+5"`, `" UTC-7"`.
static UTC_OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" UTC(?:[+-]\d+)?").expect("Invalid regex"));

type TextDateRule = fn(&str) -> Option<NaiveDate>;

/// Text date parsers, tried in order.
const TEXT_DATE_RULES: &[TextDateRule] = &[
    parse_console_date,
    parse_rfc3339_date,
    parse_long_date,
    parse_iso_date,
];

/// Resolve a stored date to a calendar date (UTC for timestamps).
#[must_use]
pub fn parse_date(raw: &RawDate) -> Option<NaiveDate> {
    match raw {
        RawDate::Timestamp(ts) => Some(ts.date_naive()),
        RawDate::Text(text) => {
            let text = text.trim();
            TEXT_DATE_RULES.iter().find_map(|rule| rule(text))
        }
    }
}

/// Format as `M/D/YYYY`, or `N/A`.
#[must_use]
pub fn format_date(raw: Option<&RawDate>) -> String {
    raw.and_then(parse_date)
        .map_or_else(|| NOT_AVAILABLE.to_string(), format_calendar_date)
}

/// `M/D/YYYY` without zero padding.
#[must_use]
pub fn format_calendar_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// `"December 15, 2025 at 2:54:49 PM UTC+5"`, as the database console shows
/// timestamps. The offset is dropped; the written calendar date is kept.
fn parse_console_date(text: &str) -> Option<NaiveDate> {
    let cleaned = strip_utc_offset(&text.replacen(" at ", " ", 1));
    ["%B %d, %Y %I:%M:%S %p", "%B %d, %Y %I:%M %p"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&cleaned, fmt).ok())
        .map(|dt| dt.date())
}

fn parse_rfc3339_date(text: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_utc().date())
}

fn parse_long_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%B %d, %Y").ok()
}

fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Remove the first `" UTC"` token and its optional `+N` / `-N` offset.
fn strip_utc_offset(text: &str) -> String {
    UTC_OFFSET_RE.replacen(text, 1, "").into_owned()
}

/// Package label: `24 Hours`, `Monthly`, or the id verbatim.
#[must_use]
pub fn normalize_package(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };
    let lower = raw.to_lowercase();

    if lower.contains("24h") {
        "24 Hours".to_string()
    } else if lower.contains("monthly") || lower.contains("1m") {
        "Monthly".to_string()
    } else {
        raw.to_owned()
    }
}

/// Platform label: `iOS`, `Android`, or the value verbatim.
#[must_use]
pub fn normalize_platform(raw: Option<&str>) -> String {
    raw.filter(|r| !r.is_empty())
        .map_or_else(|| NOT_AVAILABLE.to_string(), |r| Platform::parse(r).to_string())
}

/// The value, or `N/A` when absent.
#[must_use]
pub fn or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_owned()
}
