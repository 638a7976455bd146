//! Dashboard counters and the 7-day activity table.

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;

use super::users::format::{format_calendar_date, parse_date};
use super::users::UserSources;
use crate::models::RawDate;

/// Days covered by the activity series, including today.
pub const ACTIVITY_WINDOW_DAYS: u64 = 7;

/// One day of the activity series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub label: String,
    pub active_users: usize,
    pub pins_saved: usize,
}

/// Headline counters shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub total_users: usize,
    /// Accounts whose `lastActive` falls within the activity window.
    pub active_users: usize,
    pub total_vehicles: usize,
    /// Pins whose `carPinnedTime` is today (UTC).
    pub pins_today: usize,
    /// Oldest day first.
    pub activity: Vec<DailyActivity>,
}

impl DashboardMetrics {
    /// Compute every counter for the given UTC day.
    #[must_use]
    pub fn compute(sources: &UserSources, today: NaiveDate) -> Self {
        let window: Vec<NaiveDate> = (0..ACTIVITY_WINDOW_DAYS)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .collect();

        let active_days: Vec<NaiveDate> = dates(sources.accounts.iter().map(|a| a.last_active.as_ref()));
        let pin_days: Vec<NaiveDate> = dates(sources.pins.iter().map(|p| p.pinned.as_ref()));

        let count_on = |days: &[NaiveDate], day: NaiveDate| days.iter().filter(|d| **d == day).count();

        let activity = window
            .iter()
            .map(|&date| DailyActivity {
                date,
                label: format_calendar_date(date),
                active_users: count_on(&active_days, date),
                pins_saved: count_on(&pin_days, date),
            })
            .collect();

        let oldest = window.first().copied().unwrap_or(today);
        Self {
            total_users: sources.accounts.len(),
            active_users: active_days
                .iter()
                .filter(|d| (oldest..=today).contains(*d))
                .count(),
            total_vehicles: sources.vehicles.len(),
            pins_today: count_on(&pin_days, today),
            activity,
        }
    }

    /// Compute for the current UTC day.
    #[must_use]
    pub fn compute_now(sources: &UserSources) -> Self {
        Self::compute(sources, Utc::now().date_naive())
    }
}

fn dates<'a>(raw: impl Iterator<Item = Option<&'a RawDate>>) -> Vec<NaiveDate> {
    raw.flatten().filter_map(parse_date).collect()
}
