//! Notification broadcast and history.
//!
//! A broadcast writes one notification document per account (fan-out), all
//! sharing a generated `broadcastId`. For push broadcasts the collected
//! device tokens are then sent to the push relay in a single request.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use spot_my_ride_core::{BroadcastId, NotificationKind};

use super::push::PushClient;
use super::users::format::format_calendar_date;
use super::users::NOT_AVAILABLE;
use crate::db::{AccountRepository, NewNotification, NotificationRepository, RepositoryError};
use crate::models::Notification;
use crate::store::{DocumentStore, generate_document_id};

/// Errors that can occur while broadcasting.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// The compose form was incomplete or malformed.
    #[error("{0}")]
    Validation(String),

    /// Reading recipients failed; nothing was written.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Some fan-out inserts failed. Written documents are kept.
    #[error("{failed} notifications could not be saved ({written} saved)")]
    PartialWrite { written: usize, failed: usize },
}

/// A validated compose form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastRequest {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl BroadcastRequest {
    /// Validate raw form input. Title and message are trimmed and required.
    ///
    /// # Errors
    ///
    /// Returns `BroadcastError::Validation` describing the first problem.
    pub fn parse(kind: &str, title: &str, message: &str) -> Result<Self, BroadcastError> {
        let kind = kind
            .parse::<NotificationKind>()
            .map_err(|e| BroadcastError::Validation(e.to_string()))?;
        let title = title.trim();
        let message = message.trim();

        if title.is_empty() {
            return Err(BroadcastError::Validation("Title is required".to_string()));
        }
        if message.is_empty() {
            return Err(BroadcastError::Validation("Message is required".to_string()));
        }

        Ok(Self {
            kind,
            title: title.to_owned(),
            message: message.to_owned(),
        })
    }
}

/// What happened to the push step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Email broadcasts never push.
    NotRequested,
    /// No account had a device token.
    NoRecipients,
    /// No relay endpoint is configured.
    NotConfigured { recipients: usize },
    Delivered { recipients: usize },
    Failed { recipients: usize, reason: String },
}

/// Summary of a completed broadcast.
#[derive(Debug, Clone)]
pub struct BroadcastReport {
    pub broadcast_id: BroadcastId,
    pub kind: NotificationKind,
    pub written: usize,
    pub push: PushOutcome,
}

impl BroadcastReport {
    /// True when documents were saved but push delivery did not happen.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(
            self.push,
            PushOutcome::NotConfigured { .. } | PushOutcome::Failed { .. }
        )
    }

    /// Feedback line for the admin.
    #[must_use]
    pub fn message(&self) -> String {
        let saved = format!("Notification saved for {} users", self.written);
        match &self.push {
            PushOutcome::NotRequested => format!("{saved}."),
            PushOutcome::NoRecipients => format!("{saved}. No devices registered for push."),
            PushOutcome::Delivered { recipients } => {
                format!("{saved} and pushed to {recipients} devices.")
            }
            PushOutcome::NotConfigured { .. } => {
                format!("{saved}, but push delivery is not configured.")
            }
            PushOutcome::Failed { .. } => format!("{saved}, but push delivery failed."),
        }
    }
}

/// Write one notification per account, then push if requested.
///
/// # Errors
///
/// Returns `BroadcastError::Repository` if the account scan fails (nothing
/// is written), or `BroadcastError::PartialWrite` if any insert fails. Push
/// failures are reported through [`BroadcastReport::push`], not as errors.
#[instrument(skip(store, push, request), fields(kind = %request.kind))]
pub async fn broadcast(
    store: &DocumentStore,
    push: Option<&PushClient>,
    request: &BroadcastRequest,
) -> Result<BroadcastReport, BroadcastError> {
    let accounts = AccountRepository::new(store).list_all().await?;
    let broadcast_id = BroadcastId::new(generate_document_id());
    let notifications = NotificationRepository::new(store);

    let writes = accounts.iter().map(|account| {
        notifications.insert(NewNotification {
            kind: request.kind,
            title: &request.title,
            description: &request.message,
            user_id: &account.id,
            broadcast_id: &broadcast_id,
        })
    });
    let results = join_all(writes).await;

    let failed = results.iter().filter(|r| r.is_err()).count();
    let written = results.len() - failed;
    if let Some(Err(first)) = results.iter().find(|r| r.is_err()) {
        tracing::error!(
            broadcast_id = %broadcast_id,
            written,
            failed,
            error = %first,
            "Notification fan-out partially failed"
        );
        return Err(BroadcastError::PartialWrite { written, failed });
    }

    tracing::info!(broadcast_id = %broadcast_id, written, "Notifications written");

    let tokens: Vec<String> = accounts
        .iter()
        .filter_map(|account| account.device_token.clone())
        .collect();
    let push = deliver(push, request, &tokens).await;

    Ok(BroadcastReport {
        broadcast_id,
        kind: request.kind,
        written,
        push,
    })
}

async fn deliver(
    client: Option<&PushClient>,
    request: &BroadcastRequest,
    tokens: &[String],
) -> PushOutcome {
    if request.kind != NotificationKind::Push {
        return PushOutcome::NotRequested;
    }
    if tokens.is_empty() {
        return PushOutcome::NoRecipients;
    }
    let recipients = tokens.len();
    let Some(client) = client else {
        tracing::warn!(recipients, "Push requested but no relay endpoint is configured");
        return PushOutcome::NotConfigured { recipients };
    };

    match client.send(&request.title, &request.message, tokens).await {
        Ok(()) => PushOutcome::Delivered { recipients },
        Err(e) => {
            tracing::warn!(recipients, error = %e, "Push delivery failed");
            PushOutcome::Failed {
                recipients,
                reason: e.to_string(),
            }
        }
    }
}

// =============================================================================
// History
// =============================================================================

/// One past broadcast, reconstructed from its fan-out documents.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastSummary {
    /// `broadcastId`, or the document id for ungrouped documents.
    pub key: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(skip)]
    pub sent_at: Option<DateTime<Utc>>,
    pub date: String,
    pub time: String,
    pub recipients: usize,
}

impl BroadcastSummary {
    fn from_group(key: String, group: &[&Notification]) -> Option<Self> {
        let first = group.first()?;
        let sent_at = group.iter().filter_map(|n| n.created_at).min();
        let (date, time) = sent_at.map_or_else(
            || (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
            |ts| {
                (
                    format_calendar_date(ts.date_naive()),
                    ts.format("%-I:%M %p").to_string(),
                )
            },
        );

        Some(Self {
            key,
            kind: first.kind.clone(),
            title: first.title.clone(),
            message: first.description.clone(),
            sent_at,
            date,
            time,
            recipients: group.len(),
        })
    }

    /// Case-insensitive match over kind, title, message, date and time.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || [&self.kind, &self.title, &self.message, &self.date, &self.time]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Group notifications by broadcast, newest first.
#[must_use]
pub fn summarize(notifications: &[Notification]) -> Vec<BroadcastSummary> {
    let mut groups: HashMap<String, Vec<&Notification>> = HashMap::new();
    for notification in notifications {
        let key = notification.broadcast_id.as_ref().map_or_else(
            || notification.id.to_string(),
            ToString::to_string,
        );
        groups.entry(key).or_default().push(notification);
    }

    let mut summaries: Vec<BroadcastSummary> = groups
        .into_iter()
        .filter_map(|(key, group)| BroadcastSummary::from_group(key, &group))
        .collect();

    // Undated groups sort last; keys break ties so output is stable.
    summaries.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then_with(|| a.key.cmp(&b.key)));
    summaries
}

/// Load broadcast history, filtered by `query`.
///
/// # Errors
///
/// Returns `RepositoryError` if the scan fails.
#[instrument(skip(store))]
pub async fn history(
    store: &DocumentStore,
    query: &str,
) -> Result<Vec<BroadcastSummary>, RepositoryError> {
    let notifications = NotificationRepository::new(store).list_all().await?;
    Ok(summarize(&notifications)
        .into_iter()
        .filter(|summary| summary.matches(query))
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use spot_my_ride_core::NotificationId;

    use crate::store::{Fields, MemoryStore, Value, collections};

    fn notification(id: &str, broadcast: Option<&str>, minute: u32) -> Notification {
        Notification {
            id: NotificationId::new(id),
            kind: "Push".to_string(),
            title: format!("Title {}", broadcast.unwrap_or(id)),
            description: "Move your car".to_string(),
            is_read: false,
            user_id: None,
            broadcast_id: broadcast.map(BroadcastId::new),
            created_at: Some(Utc.with_ymd_and_hms(2025, 3, 7, 14, minute, 0).unwrap()),
        }
    }

    async fn store_with_accounts(tokens: &[Option<&str>]) -> (MemoryStore, DocumentStore) {
        let memory = MemoryStore::new();
        for (i, token) in tokens.iter().enumerate() {
            let mut fields = Fields::new();
            fields.insert("name".into(), Value::string(format!("User {i}")));
            if let Some(token) = token {
                fields.insert("deviceToken".into(), Value::string(*token));
            }
            memory.put(collections::USERS, &format!("u{i}"), fields).await;
        }
        let store = DocumentStore::Memory(memory.clone());
        (memory, store)
    }

    #[test]
    fn test_request_validation() {
        assert!(BroadcastRequest::parse("Push", "  ", "body").is_err());
        assert!(BroadcastRequest::parse("Push", "Title", "").is_err());
        assert!(BroadcastRequest::parse("Fax", "Title", "body").is_err());

        let req = BroadcastRequest::parse("email", " Title ", " body ").unwrap();
        assert_eq!(req.kind, NotificationKind::Email);
        assert_eq!(req.title, "Title");
        assert_eq!(req.message, "body");
    }

    #[tokio::test]
    async fn test_email_broadcast_writes_one_document_per_account() {
        let (memory, store) = store_with_accounts(&[Some("tok"), None, None]).await;
        let req = BroadcastRequest::parse("Email", "Hello", "World").unwrap();

        let report = broadcast(&store, None, &req).await.unwrap();
        assert_eq!(report.written, 3);
        assert_eq!(report.push, PushOutcome::NotRequested);
        assert_eq!(memory.count(collections::NOTIFICATIONS).await, 3);
    }

    #[tokio::test]
    async fn test_push_without_tokens_still_writes() {
        let (memory, store) = store_with_accounts(&[None, None]).await;
        let req = BroadcastRequest::parse("Push", "Hello", "World").unwrap();

        let report = broadcast(&store, None, &req).await.unwrap();
        assert_eq!(report.push, PushOutcome::NoRecipients);
        assert!(!report.is_warning());
        assert_eq!(memory.count(collections::NOTIFICATIONS).await, 2);
    }

    #[tokio::test]
    async fn test_push_without_relay_is_a_warning() {
        let (_, store) = store_with_accounts(&[Some("a"), Some("b"), None]).await;
        let req = BroadcastRequest::parse("Push", "Hello", "World").unwrap();

        let report = broadcast(&store, None, &req).await.unwrap();
        assert_eq!(report.push, PushOutcome::NotConfigured { recipients: 2 });
        assert!(report.is_warning());
    }

    #[tokio::test]
    async fn test_broadcast_shares_one_id() {
        let (_, store) = store_with_accounts(&[None, None]).await;
        let req = BroadcastRequest::parse("Email", "Hello", "World").unwrap();
        let report = broadcast(&store, None, &req).await.unwrap();

        let all = NotificationRepository::new(&store).list_all().await.unwrap();
        assert!(all.iter().all(|n| n.broadcast_id.as_ref() == Some(&report.broadcast_id)));

        let summaries = history(&store, "").await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].recipients, 2);
    }

    #[tokio::test]
    async fn test_account_scan_failure_writes_nothing() {
        let (memory, store) = store_with_accounts(&[None]).await;
        memory.set_offline(true);
        let req = BroadcastRequest::parse("Email", "Hello", "World").unwrap();

        let result = broadcast(&store, None, &req).await;
        assert!(matches!(result, Err(BroadcastError::Repository(_))));
        memory.set_offline(false);
        assert_eq!(memory.count(collections::NOTIFICATIONS).await, 0);
    }

    #[test]
    fn test_summarize_groups_and_orders() {
        let notifications = vec![
            notification("n1", Some("b1"), 0),
            notification("n2", Some("b1"), 0),
            notification("n3", Some("b2"), 30),
            notification("n4", None, 15),
        ];
        let summaries = summarize(&notifications);

        let keys: Vec<&str> = summaries.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["b2", "n4", "b1"]);
        assert_eq!(summaries[2].recipients, 2);
        assert_eq!(summaries[0].date, "3/7/2025");
        assert_eq!(summaries[0].time, "2:30 PM");
    }

    #[test]
    fn test_summary_search() {
        let summaries = summarize(&[notification("n1", Some("b1"), 5)]);
        let summary = &summaries[0];
        assert!(summary.matches("title b1"));
        assert!(summary.matches("PUSH"));
        assert!(summary.matches("3/7/2025"));
        assert!(summary.matches("2:05"));
        assert!(!summary.matches("email"));
    }

    #[test]
    fn test_report_messages() {
        let report = BroadcastReport {
            broadcast_id: BroadcastId::new("b"),
            kind: NotificationKind::Push,
            written: 4,
            push: PushOutcome::Failed {
                recipients: 2,
                reason: "502".to_string(),
            },
        };
        assert!(report.is_warning());
        assert_eq!(
            report.message(),
            "Notification saved for 4 users, but push delivery failed."
        );
    }
}
