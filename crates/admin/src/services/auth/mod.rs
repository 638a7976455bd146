//! Admin authentication service.
//!
//! Email + password login against the `admin` collection. Passwords are
//! verified against Argon2id PHC strings only; documents that still hold a
//! clear-text `password` are refused until an operator resets them with
//! `smr-cli admin set-password`.

mod error;

pub use error::AdminAuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use spot_my_ride_core::Email;

use crate::db::{AdminUserRepository, RepositoryError};
use crate::models::AdminUser;
use crate::store::DocumentStore;

/// Minimum password length for admin accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self {
            users: AdminUserRepository::new(store),
        }
    }

    /// Verify an email/password pair and return the matching admin.
    ///
    /// # Errors
    ///
    /// Returns a validation error (`MissingField`, `InvalidEmail`,
    /// `WeakPassword`) before touching the store.
    /// Returns `AdminAuthError::Unavailable` if the lookup fails.
    /// Returns `AdminAuthError::InvalidCredentials` on no match or a wrong
    /// password, and `AdminAuthError::LegacyPassword` for unmigrated documents.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, AdminAuthError> {
        let email = validate_login_form(email, password)?;

        let user = self
            .users
            .get_by_email(&email)
            .await
            .map_err(AdminAuthError::Unavailable)?
            .ok_or(AdminAuthError::InvalidCredentials)?;

        let Some(hash) = user.password_hash.as_deref() else {
            if user.has_legacy_password {
                tracing::warn!(
                    admin_id = %user.id,
                    "Admin credential has a clear-text password; reset it with `smr-cli admin set-password`"
                );
                return Err(AdminAuthError::LegacyPassword);
            }
            return Err(AdminAuthError::InvalidCredentials);
        };

        verify_password(password, hash)?;
        tracing::info!(admin_id = %user.id, "Admin signed in");
        Ok(user)
    }

    /// Create a new admin credential.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::UserAlreadyExists` if the email is taken.
    /// Returns `AdminAuthError::WeakPassword` if the password is too short.
    #[instrument(skip(self, password))]
    pub async fn create_admin(
        &self,
        email: &Email,
        name: &str,
        password: &str,
    ) -> Result<AdminUser, AdminAuthError> {
        validate_password(password)?;
        let hash = hash_password(password)?;

        let id = self
            .users
            .create(email, name, &hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AdminAuthError::UserAlreadyExists,
                other => AdminAuthError::Unavailable(other),
            })?;

        Ok(AdminUser {
            id,
            email: email.clone(),
            name: name.to_owned(),
            password_hash: Some(hash),
            has_legacy_password: false,
        })
    }

    /// Replace an admin's password, removing any clear-text leftover.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::UserNotFound` if no admin has that email.
    #[instrument(skip(self, password))]
    pub async fn set_password(&self, email: &Email, password: &str) -> Result<(), AdminAuthError> {
        validate_password(password)?;

        let user = self
            .users
            .get_by_email(email)
            .await
            .map_err(AdminAuthError::Unavailable)?
            .ok_or(AdminAuthError::UserNotFound)?;

        let hash = hash_password(password)?;
        self.users
            .set_password_hash(&user.id, &hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AdminAuthError::UserNotFound,
                other => AdminAuthError::Unavailable(other),
            })
    }
}

/// Validate the login form before any lookup.
///
/// # Errors
///
/// Returns the first validation failure.
pub fn validate_login_form(email: &str, password: &str) -> Result<Email, AdminAuthError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AdminAuthError::MissingField("email"));
    }
    if password.is_empty() {
        return Err(AdminAuthError::MissingField("password"));
    }
    let email = Email::parse(email)?;
    validate_password(password)?;
    Ok(email)
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `AdminAuthError::WeakPassword` if it is too short.
pub fn validate_password(password: &str) -> Result<(), AdminAuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AdminAuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AdminAuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AdminAuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AdminAuthError::InvalidCredentials` on mismatch or a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AdminAuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AdminAuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AdminAuthError::InvalidCredentials)
}
