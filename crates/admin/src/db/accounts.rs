//! Account repository (`users` collection).

use spot_my_ride_core::{AccountId, AccountStatus};

use super::{RepositoryError, raw_date, text};
use crate::models::Account;
use crate::store::{Document, DocumentStore, FieldsExt, StoreError, Value, collections};

impl From<&Document> for Account {
    fn from(doc: &Document) -> Self {
        let fields = &doc.fields;

        // Boolean `active` is authoritative; older documents only carry `status`.
        let status = fields.bool_field("active").map_or_else(
            || {
                fields
                    .str_field("status")
                    .map_or(AccountStatus::Suspended, AccountStatus::from_legacy)
            },
            AccountStatus::from_active_flag,
        );

        Self {
            id: AccountId::new(doc.id()),
            name: text(fields, "name"),
            email: text(fields, "email"),
            phone: text(fields, "phoneNumber"),
            status,
            joined: raw_date(fields, "joiningDate"),
            last_active: raw_date(fields, "lastActive"),
            image: text(fields, "image"),
            device_token: text(fields, "deviceToken"),
            uid: text(fields, "uid"),
            user_id2: text(fields, "userId2"),
            total_spots: text(fields, "totalSpots"),
            subscription: text(fields, "subscription"),
        }
    }
}

/// Repository for end-user accounts.
pub struct AccountRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> AccountRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// List every account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the scan fails.
    pub async fn list_all(&self) -> Result<Vec<Account>, RepositoryError> {
        let docs = self.store.list(collections::USERS).await?;
        Ok(docs.iter().map(Account::from).collect())
    }

    /// Get one account by document key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the read fails.
    pub async fn get(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        let doc = self.store.get(collections::USERS, id.as_str()).await?;
        Ok(doc.as_ref().map(Account::from))
    }

    /// Persist a new status as the boolean `active` flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    pub async fn set_status(
        &self,
        id: &AccountId,
        status: AccountStatus,
    ) -> Result<(), RepositoryError> {
        self.store
            .update_field(
                collections::USERS,
                id.as_str(),
                "active",
                Value::from(status.is_active()),
            )
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => RepositoryError::NotFound,
                other => RepositoryError::Store(other),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::Fields;

    fn doc(fields: Fields) -> Document {
        Document {
            name: "projects/p/databases/(default)/documents/users/u1".to_string(),
            fields,
            create_time: None,
            update_time: None,
        }
    }

    #[test]
    fn test_status_prefers_boolean_flag() {
        let mut fields = Fields::new();
        fields.insert("active".into(), Value::from(true));
        fields.insert("status".into(), Value::string("suspended"));
        assert_eq!(Account::from(&doc(fields)).status, AccountStatus::Active);
    }

    #[test]
    fn test_status_falls_back_to_legacy_string() {
        let mut fields = Fields::new();
        fields.insert("status".into(), Value::string("active"));
        assert_eq!(Account::from(&doc(fields)).status, AccountStatus::Active);
    }

    #[test]
    fn test_status_defaults_to_suspended() {
        assert_eq!(
            Account::from(&doc(Fields::new())).status,
            AccountStatus::Suspended
        );
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let mut fields = Fields::new();
        fields.insert("name".into(), Value::string(""));
        fields.insert("phoneNumber".into(), Value::from(5_550_100_i64));
        let account = Account::from(&doc(fields));
        assert_eq!(account.name, None);
        assert_eq!(account.phone.as_deref(), Some("5550100"));
        assert_eq!(account.id.as_str(), "u1");
    }
}
