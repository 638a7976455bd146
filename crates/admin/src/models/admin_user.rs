//! Admin user domain types.
//!
//! These types represent validated domain objects for admin authentication.

use spot_my_ride_core::{AdminId, Email};

/// A staff credential (`admin` collection).
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Document key.
    pub id: AdminId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// Argon2 PHC string, once the credential has been migrated.
    pub password_hash: Option<String>,
    /// Whether the document still carries a clear-text `password` field.
    pub has_legacy_password: bool,
}
