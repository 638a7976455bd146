//! Repositories over the remote document store.
//!
//! Each repository borrows a [`DocumentStore`] and converts raw documents
//! into domain models from [`crate::models`].
//!
//! # Collections
//!
//! - `admin` - Staff credentials ([`AdminUserRepository`])
//! - `users` - End-user accounts ([`AccountRepository`])
//! - `myCars` - Vehicles ([`VehicleRepository`])
//! - `pinnedCars` - Pinned locations ([`PinRepository`])
//! - `Subscriptions` - Purchases ([`SubscriptionRepository`])
//! - `notifications` - Broadcast copies ([`NotificationRepository`])

pub mod accounts;
pub mod admin_users;
pub mod notifications;
pub mod pins;
pub mod subscriptions;
pub mod vehicles;

use thiserror::Error;

use crate::models::RawDate;
use crate::store::{Fields, FieldsExt, StoreError};

pub use accounts::AccountRepository;
pub use admin_users::AdminUserRepository;
pub use notifications::{NewNotification, NotificationRepository};
pub use pins::PinRepository;
pub use subscriptions::SubscriptionRepository;
pub use vehicles::VehicleRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Document store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Uniqueness violation (e.g., duplicate admin email).
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Read a date field that may be a timestamp or a display string.
pub(crate) fn raw_date(fields: &Fields, name: &str) -> Option<RawDate> {
    fields.get(name).and_then(RawDate::from_value)
}

/// Read a non-empty text field.
pub(crate) fn text(fields: &Fields, name: &str) -> Option<String> {
    fields.text_field(name)
}
