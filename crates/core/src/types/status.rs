//! Status and classification enums shared across the dashboard.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether an end-user account may use the mobile application.
///
/// Stored remotely as the boolean `active` field. Some older documents carry a
/// string `status` field instead; [`AccountStatus::from_legacy`] reads those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    #[default]
    Suspended,
}

impl AccountStatus {
    /// Map the stored boolean flag to a status.
    #[must_use]
    pub const fn from_active_flag(active: bool) -> Self {
        if active { Self::Active } else { Self::Suspended }
    }

    /// Read a legacy string status (`"Active"`, `"active"`, `"Suspended"`...).
    ///
    /// Anything other than a case-insensitive `active` is treated as suspended.
    #[must_use]
    pub fn from_legacy(status: &str) -> Self {
        Self::from_active_flag(status.trim().eq_ignore_ascii_case("active"))
    }

    /// The boolean written back to the store.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// The opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Suspended,
            Self::Suspended => Self::Active,
        }
    }

    /// Display label (`Active` / `Suspended`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Suspended => "Suspended",
        }
    }

    /// Past-tense verb used in confirmation messages.
    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Active => "activated",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a notification kind string is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown notification kind: {0}")]
pub struct UnknownNotificationKind(pub String);

/// Delivery channel for a broadcast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NotificationKind {
    #[default]
    Email,
    Push,
}

impl NotificationKind {
    /// Value stored in the `type` field of a notification document.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Push => "Push",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "push" => Ok(Self::Push),
            _ => Err(UnknownNotificationKind(s.to_owned())),
        }
    }
}

/// Store on which a subscription was purchased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Ios,
    Android,
    /// Anything else, kept verbatim.
    Other(String),
}

impl Platform {
    /// Classify a raw platform string. Matching is exact (`ios`, `android`).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "ios" => Self::Ios,
            "android" => Self::Android,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_account_status_toggle_twice_is_identity() {
        for status in [AccountStatus::Active, AccountStatus::Suspended] {
            assert_eq!(status.toggled().toggled(), status);
            assert_ne!(status.toggled(), status);
        }
    }

    #[test]
    fn test_account_status_from_flag() {
        assert_eq!(AccountStatus::from_active_flag(true), AccountStatus::Active);
        assert!(!AccountStatus::from_active_flag(false).is_active());
    }

    #[test]
    fn test_account_status_from_legacy() {
        assert_eq!(AccountStatus::from_legacy("Active"), AccountStatus::Active);
        assert_eq!(AccountStatus::from_legacy(" active "), AccountStatus::Active);
        assert_eq!(
            AccountStatus::from_legacy("Suspended"),
            AccountStatus::Suspended
        );
        assert_eq!(AccountStatus::from_legacy(""), AccountStatus::Suspended);
    }

    #[test]
    fn test_account_status_wording() {
        assert_eq!(AccountStatus::Active.past_tense(), "activated");
        assert_eq!(AccountStatus::Suspended.past_tense(), "suspended");
        assert_eq!(AccountStatus::Active.to_string(), "Active");
    }

    #[test]
    fn test_notification_kind_parse() {
        assert_eq!("Email".parse::<NotificationKind>().unwrap(), NotificationKind::Email);
        assert_eq!("push".parse::<NotificationKind>().unwrap(), NotificationKind::Push);
        assert!("sms".parse::<NotificationKind>().is_err());
    }

    #[test]
    fn test_notification_kind_stored_value() {
        assert_eq!(NotificationKind::Push.as_str(), "Push");
        let json = serde_json::to_string(&NotificationKind::Email).unwrap();
        assert_eq!(json, "\"Email\"");
    }

    #[test]
    fn test_platform_labels() {
        assert_eq!(Platform::parse("ios").label(), "iOS");
        assert_eq!(Platform::parse("android").label(), "Android");
        assert_eq!(Platform::parse("web").label(), "web");
        // Only the exact lowercase spellings are normalised.
        assert_eq!(Platform::parse("IOS").label(), "IOS");
    }
}
