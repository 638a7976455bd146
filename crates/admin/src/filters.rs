//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Up to two uppercase initials for an avatar placeholder.
///
/// Usage in templates: `{{ user.name|initials }}`
#[askama::filter_fn]
pub fn initials(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(initials_of(&value.to_string()))
}

/// Shorten text to `max` characters, appending an ellipsis when cut.
///
/// Usage in templates: `{{ entry.message|truncate_chars(80) }}`
#[askama::filter_fn]
pub fn truncate_chars(
    value: impl Display,
    _env: &dyn askama::Values,
    max: usize,
) -> askama::Result<String> {
    Ok(truncate(&value.to_string(), max))
}

fn initials_of(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(initials_of("Ali Khan"), "AK");
        assert_eq!(initials_of("dana"), "D");
        assert_eq!(initials_of("Mary Jane Watson"), "MJ");
        assert_eq!(initials_of("N/A"), "N");
        assert_eq!(initials_of("   "), "?");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("hello world again", 11), "hello world…");
        assert_eq!(truncate("hello world again", 6), "hello…");
    }
}
