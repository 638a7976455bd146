//! Notification document (`notifications` collection).

use chrono::{DateTime, Utc};

use spot_my_ride_core::{AccountId, BroadcastId, NotificationId};

/// One recipient's copy of a broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    /// Stored `type`; older documents may carry kinds no longer offered.
    pub kind: String,
    pub title: String,
    pub description: String,
    pub is_read: bool,
    pub user_id: Option<AccountId>,
    pub broadcast_id: Option<BroadcastId>,
    /// Server-assigned; absent only on malformed documents.
    pub created_at: Option<DateTime<Utc>>,
}
