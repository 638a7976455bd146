//! Admin user repository (`admin` collection).
//!
//! Credentials are looked up by email. Passwords are stored only as Argon2
//! PHC strings in `passwordHash`; a clear-text `password` field left over from
//! earlier tooling is detected but never read.

use spot_my_ride_core::{AdminId, Email};

use super::{RepositoryError, text};
use crate::models::AdminUser;
use crate::store::{Document, DocumentStore, Fields, FieldsExt, StoreError, Value, collections};

impl TryFrom<&Document> for AdminUser {
    type Error = RepositoryError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        let fields = &doc.fields;
        let raw_email = fields.str_field("email").unwrap_or_default();
        let email = Email::parse(raw_email.trim()).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email on admin {}: {e}", doc.id()))
        })?;

        Ok(Self {
            id: AdminId::new(doc.id()),
            name: text(fields, "name").unwrap_or_else(|| email.local_part().to_owned()),
            email,
            password_hash: text(fields, "passwordHash"),
            has_legacy_password: fields.contains_key("password"),
        })
    }
}

/// Repository for admin credentials.
pub struct AdminUserRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Get an admin user by document key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the read fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: &AdminId) -> Result<Option<AdminUser>, RepositoryError> {
        self.store
            .get(collections::ADMIN, id.as_str())
            .await?
            .as_ref()
            .map(AdminUser::try_from)
            .transpose()
    }

    /// Get an admin user by email address.
    ///
    /// Duplicate documents for one email are tolerated; the first by key wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<AdminUser>, RepositoryError> {
        let mut docs = self
            .store
            .find_by_field(collections::ADMIN, "email", email.as_str())
            .await?;
        docs.sort_by(|a, b| a.id().cmp(b.id()));

        if docs.len() > 1 {
            tracing::warn!(count = docs.len(), "Multiple admin documents share one email");
        }

        docs.first().map(AdminUser::try_from).transpose()
    }

    /// Create a new admin credential.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminId, RepositoryError> {
        if self.get_by_email(email).await?.is_some() {
            return Err(RepositoryError::Conflict(format!(
                "admin {email} already exists"
            )));
        }

        let mut fields = Fields::new();
        fields.insert("email".into(), Value::string(email.as_str()));
        fields.insert("name".into(), Value::string(name));
        fields.insert("passwordHash".into(), Value::string(password_hash));

        let id = self
            .store
            .insert(collections::ADMIN, fields, Some("createdAt"))
            .await?;
        Ok(AdminId::new(id))
    }

    /// Replace the password hash and drop any legacy clear-text password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the admin does not exist.
    pub async fn set_password_hash(
        &self,
        id: &AdminId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut set = Fields::new();
        set.insert("passwordHash".into(), Value::string(password_hash));

        self.store
            .update(collections::ADMIN, id.as_str(), set, &["password"])
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => RepositoryError::NotFound,
                other => RepositoryError::Store(other),
            })
    }
}
