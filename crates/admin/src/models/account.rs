//! End-user account (`users` collection).

use spot_my_ride_core::{AccountId, AccountStatus};

use super::RawDate;

/// An end-user of the mobile application.
///
/// Text fields are `None` when absent or empty in the stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: AccountStatus,
    pub joined: Option<RawDate>,
    pub last_active: Option<RawDate>,
    pub image: Option<String>,
    /// Push token registered by the device, if any.
    pub device_token: Option<String>,
    /// Auth uid, when the document key differs from it.
    pub uid: Option<String>,
    /// Secondary user key used by some subscription records.
    pub user_id2: Option<String>,
    pub total_spots: Option<String>,
    /// Free-text subscription summary written by the app.
    pub subscription: Option<String>,
}
