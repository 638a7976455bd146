//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use spot_my_ride_core::{AdminId, Email};

use super::AdminUser;

/// Authenticated admin identity, resolved from the session cookies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin document key.
    pub id: AdminId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
