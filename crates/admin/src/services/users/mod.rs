//! User aggregation view and the suspend/activate mutation.
//!
//! The view is rebuilt from four full collection scans on every list load and
//! cached in a [`UserDirectory`] so the detail page and status toggle do not
//! need to re-fetch.

pub mod aggregate;
pub mod format;

use tokio::sync::RwLock;
use tracing::instrument;

use spot_my_ride_core::{AccountId, AccountStatus};

pub use aggregate::{
    PinView, SubscriptionView, UserRecord, UserSources, VehicleView, aggregate, subscription_owner,
};
pub use format::{NOT_AVAILABLE, format_date};

use crate::db::{
    AccountRepository, PinRepository, RepositoryError, SubscriptionRepository, VehicleRepository,
};
use crate::store::DocumentStore;

/// Rows per page in the user table.
pub const PAGE_SIZE: usize = 10;

/// Fetch all four collections concurrently.
///
/// # Errors
///
/// Returns the first `RepositoryError` if any scan fails.
#[instrument(skip(store))]
pub async fn fetch_sources(store: &DocumentStore) -> Result<UserSources, RepositoryError> {
    let account_repo = AccountRepository::new(store);
    let vehicle_repo = VehicleRepository::new(store);
    let pin_repo = PinRepository::new(store);
    let subscription_repo = SubscriptionRepository::new(store);
    let (accounts, vehicles, pins, subscriptions) = tokio::try_join!(
        account_repo.list_all(),
        vehicle_repo.list_all(),
        pin_repo.list_all(),
        subscription_repo.list_all(),
    )?;

    tracing::debug!(
        accounts = accounts.len(),
        vehicles = vehicles.len(),
        pins = pins.len(),
        subscriptions = subscriptions.len(),
        "Fetched user sources"
    );

    Ok(UserSources {
        accounts,
        vehicles,
        pins,
        subscriptions,
    })
}

/// Case-insensitive substring match on name, email and phone.
#[must_use]
pub fn matches_search(record: &UserRecord, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty()
        || [&record.name, &record.email, &record.phone]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
}

/// Filter records by a search query, preserving order.
#[must_use]
pub fn filter_records<'a>(records: &'a [UserRecord], query: &str) -> Vec<&'a UserRecord> {
    records
        .iter()
        .filter(|record| matches_search(record, query))
        .collect()
}

/// Last loaded user view, shared across requests.
#[derive(Default)]
pub struct UserDirectory {
    records: RwLock<Option<Vec<UserRecord>>>,
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the view from the store and cache it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any collection scan fails; the previous
    /// cache is left untouched.
    pub async fn refresh(&self, store: &DocumentStore) -> Result<Vec<UserRecord>, RepositoryError> {
        let records = aggregate(&fetch_sources(store).await?);
        *self.records.write().await = Some(records.clone());
        Ok(records)
    }

    /// Cached records, if a load has happened.
    pub async fn cached(&self) -> Option<Vec<UserRecord>> {
        self.records.read().await.clone()
    }

    /// One record, loading the view first if nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a load was needed and failed.
    pub async fn find(
        &self,
        store: &DocumentStore,
        id: &AccountId,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        let cached = self.records.read().await.as_ref().map(|records| {
            records.iter().find(|r| &r.id == id).cloned()
        });

        match cached {
            Some(Some(record)) => Ok(Some(record)),
            // Cache miss on a known id can mean the account is new; reload.
            _ => Ok(self
                .refresh(store)
                .await?
                .into_iter()
                .find(|r| &r.id == id)),
        }
    }

    /// Patch the cached status of one record. Returns whether it was cached.
    pub async fn patch_status(&self, id: &AccountId, status: AccountStatus) -> bool {
        let mut guard = self.records.write().await;
        guard
            .as_mut()
            .and_then(|records| records.iter_mut().find(|r| &r.id == id))
            .map(|record| record.status = status)
            .is_some()
    }
}

/// Result of a confirmed status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub id: AccountId,
    pub status: AccountStatus,
}

impl StatusChange {
    /// Confirmation shown to the admin.
    #[must_use]
    pub fn message(&self) -> String {
        format!("User {} successfully!", self.status.past_tense())
    }
}

/// Flip an account between active and suspended.
///
/// The current value is read from the store, the flipped value is written,
/// and only after the write succeeds is the cached view patched.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the account does not exist, or
/// `RepositoryError::Store` if the read or write fails.
#[instrument(skip(store, directory), fields(account_id = %id))]
pub async fn toggle_status(
    store: &DocumentStore,
    directory: &UserDirectory,
    id: &AccountId,
) -> Result<StatusChange, RepositoryError> {
    let accounts = AccountRepository::new(store);
    let account = accounts.get(id).await?.ok_or(RepositoryError::NotFound)?;
    let status = account.status.toggled();

    accounts.set_status(id, status).await?;
    directory.patch_status(id, status).await;

    tracing::info!(status = %status, "Account status changed");
    Ok(StatusChange {
        id: id.clone(),
        status,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{Fields, MemoryStore, Value, collections};

    fn record(name: &str, email: &str, phone: &str) -> UserRecord {
        let mut account = aggregate::tests::account("x");
        account.name = Some(name.to_string());
        account.email = Some(email.to_string());
        account.phone = Some(phone.to_string());
        aggregate(&UserSources {
            accounts: vec![account],
            ..UserSources::default()
        })
        .remove(0)
    }

    #[test]
    fn test_search_matches_phone_case_insensitively() {
        let records = vec![
            record("Ayesha", "ayesha@example.com", "+92 300 1234567"),
            record("Bilal", "bilal@example.com", "+1 415 555 0100"),
        ];
        let found = filter_records(&records, "415 555");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Bilal");

        assert_eq!(filter_records(&records, "AYESHA@").len(), 1);
        assert_eq!(filter_records(&records, "  ").len(), 2);
        assert!(filter_records(&records, "nobody").is_empty());
    }

    #[test]
    fn test_status_message_wording() {
        let change = StatusChange {
            id: AccountId::new("u"),
            status: AccountStatus::Suspended,
        };
        assert_eq!(change.message(), "User suspended successfully!");
    }

    async fn seeded_store() -> DocumentStore {
        let memory = MemoryStore::new();
        let mut fields = Fields::new();
        fields.insert("name".into(), Value::string("Dana"));
        fields.insert("active".into(), Value::from(true));
        memory.put(collections::USERS, "u1", fields).await;
        DocumentStore::Memory(memory)
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_status_and_patches_cache() {
        let store = seeded_store().await;
        let directory = UserDirectory::new();
        directory.refresh(&store).await.unwrap();
        let id = AccountId::new("u1");

        let first = toggle_status(&store, &directory, &id).await.unwrap();
        assert_eq!(first.status, AccountStatus::Suspended);
        let cached = directory.find(&store, &id).await.unwrap().unwrap();
        assert_eq!(cached.status, AccountStatus::Suspended);

        let second = toggle_status(&store, &directory, &id).await.unwrap();
        assert_eq!(second.status, AccountStatus::Active);
        let cached = directory.find(&store, &id).await.unwrap().unwrap();
        assert_eq!(cached.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_untouched() {
        let memory = MemoryStore::new();
        let mut fields = Fields::new();
        fields.insert("active".into(), Value::from(true));
        memory.put(collections::USERS, "u1", fields).await;
        let store = DocumentStore::Memory(memory.clone());
        let directory = UserDirectory::new();
        directory.refresh(&store).await.unwrap();

        memory.set_offline(true);
        let id = AccountId::new("u1");
        assert!(toggle_status(&store, &directory, &id).await.is_err());

        let cached = directory.cached().await.unwrap();
        assert_eq!(cached[0].status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn test_toggle_unknown_account() {
        let store = seeded_store().await;
        let result = toggle_status(&store, &UserDirectory::new(), &AccountId::new("ghost")).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
