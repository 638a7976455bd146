//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Email + password login against the `admin` collection
//! - `dashboard` - Headline counters and the 7-day activity table
//! - `notifications` - Fan-out broadcast and broadcast history
//! - `push` - Push relay client
//! - `users` - User aggregation view and suspend/activate

pub mod auth;
pub mod dashboard;
pub mod notifications;
pub mod push;
pub mod users;

pub use auth::{AdminAuthError, AdminAuthService};
pub use dashboard::{DailyActivity, DashboardMetrics};
pub use notifications::{
    BroadcastError, BroadcastReport, BroadcastRequest, BroadcastSummary, PushOutcome,
};
pub use push::{PushClient, PushError};
pub use users::{StatusChange, UserDirectory, UserRecord};
