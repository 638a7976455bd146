//! Notification repository (`notifications` collection).

use spot_my_ride_core::{AccountId, BroadcastId, NotificationId, NotificationKind};

use super::{RepositoryError, text};
use crate::models::Notification;
use crate::store::{Document, DocumentStore, Fields, FieldsExt, Value, collections};

/// Server-assigned creation time field.
const CREATED_AT: &str = "createdAt";

impl From<&Document> for Notification {
    fn from(doc: &Document) -> Self {
        let fields = &doc.fields;
        Self {
            id: NotificationId::new(doc.id()),
            kind: text(fields, "type").unwrap_or_default(),
            title: text(fields, "title").unwrap_or_default(),
            description: text(fields, "description").unwrap_or_default(),
            is_read: fields.bool_field("isRead").unwrap_or(false),
            user_id: text(fields, "userId").map(AccountId::from),
            broadcast_id: text(fields, "broadcastId").map(BroadcastId::from),
            created_at: fields
                .timestamp_field(CREATED_AT)
                .or(doc.create_time),
        }
    }
}

/// A notification about to be written for one recipient.
#[derive(Debug, Clone)]
pub struct NewNotification<'a> {
    pub kind: NotificationKind,
    pub title: &'a str,
    pub description: &'a str,
    pub user_id: &'a AccountId,
    pub broadcast_id: &'a BroadcastId,
}

impl NewNotification<'_> {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("type".into(), Value::string(self.kind.as_str()));
        fields.insert("title".into(), Value::string(self.title));
        fields.insert("description".into(), Value::string(self.description));
        fields.insert("isRead".into(), Value::from(false));
        fields.insert("userId".into(), Value::string(self.user_id.as_str()));
        fields.insert("broadcastId".into(), Value::string(self.broadcast_id.as_str()));
        fields
    }
}

/// Repository for notification documents.
pub struct NotificationRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> NotificationRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// List every notification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the scan fails.
    pub async fn list_all(&self) -> Result<Vec<Notification>, RepositoryError> {
        let docs = self.store.list(collections::NOTIFICATIONS).await?;
        Ok(docs.iter().map(Notification::from).collect())
    }

    /// Write one notification; the store assigns `createdAt`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the write fails.
    pub async fn insert(
        &self,
        notification: NewNotification<'_>,
    ) -> Result<NotificationId, RepositoryError> {
        let id = self
            .store
            .insert(
                collections::NOTIFICATIONS,
                notification.into_fields(),
                Some(CREATED_AT),
            )
            .await?;
        Ok(NotificationId::new(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_insert_writes_unread_document() {
        let store = DocumentStore::Memory(MemoryStore::new());
        let repo = NotificationRepository::new(&store);
        let user = AccountId::new("u1");
        let broadcast = BroadcastId::new("b1");

        let id = repo
            .insert(NewNotification {
                kind: NotificationKind::Push,
                title: "Street sweeping",
                description: "Move your car by 8am",
                user_id: &user,
                broadcast_id: &broadcast,
            })
            .await
            .unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        let stored = &all[0];
        assert_eq!(stored.id, id);
        assert_eq!(stored.kind, "Push");
        assert!(!stored.is_read);
        assert_eq!(stored.user_id.as_ref(), Some(&user));
        assert_eq!(stored.broadcast_id.as_ref(), Some(&broadcast));
        assert!(stored.created_at.is_some());
    }
}
