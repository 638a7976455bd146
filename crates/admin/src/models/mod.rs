//! Domain models for the admin dashboard.
//!
//! These are decoded views of documents owned by the mobile application.
//! Conversions from raw documents live in [`crate::db`].

pub mod account;
pub mod admin_user;
pub mod notification;
pub mod pin;
pub mod session;
pub mod subscription;
pub mod vehicle;

use chrono::{DateTime, Utc};

use crate::store::Value;

pub use account::Account;
pub use admin_user::AdminUser;
pub use notification::Notification;
pub use pin::{PinnedLocation, VehicleSnapshot};
pub use session::CurrentAdmin;
pub use subscription::Subscription;
pub use vehicle::Vehicle;

/// A date as the mobile app stored it.
///
/// Newer documents use native timestamps; older ones carry display strings
/// such as `"December 15, 2025 at 2:54:49 PM UTC+5"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDate {
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl RawDate {
    /// Decode a field value. Non-date types are ignored.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::TimestampValue(ts) => Some(Self::Timestamp(*ts)),
            Value::StringValue(s) if !s.trim().is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}
