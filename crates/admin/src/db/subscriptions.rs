//! Subscription repository (`Subscriptions` collection).

use super::{RepositoryError, raw_date, text};
use crate::models::Subscription;
use crate::store::{Document, DocumentStore, FieldsExt, collections};

impl From<&Document> for Subscription {
    fn from(doc: &Document) -> Self {
        let fields = &doc.fields;
        Self {
            id: doc.id().to_owned(),
            // Kept untrimmed; owner resolution trims after choosing a field.
            user_id2: fields.str_field("userId2").map(str::to_owned),
            user_id: fields.str_field("userId").map(str::to_owned),
            purchased: raw_date(fields, "purchaseDate")
                .or_else(|| raw_date(fields, "purchaseTimestamp")),
            expires: raw_date(fields, "expiryDate"),
            package_id: text(fields, "packageId"),
            package_name: text(fields, "packageName"),
            price: text(fields, "price"),
            platform: text(fields, "platform"),
        }
    }
}

/// Repository for subscription purchases.
pub struct SubscriptionRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> SubscriptionRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// List every subscription.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the scan fails.
    pub async fn list_all(&self) -> Result<Vec<Subscription>, RepositoryError> {
        let docs = self.store.list(collections::SUBSCRIPTIONS).await?;
        Ok(docs.iter().map(Subscription::from).collect())
    }
}
