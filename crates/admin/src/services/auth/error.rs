//! Admin authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] spot_my_ride_core::EmailError),

    /// A required form field was left empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Password too short.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// No admin with that email, or the password did not verify.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The credential only carries a clear-text password and must be reset.
    #[error("credential has not been migrated to a password hash")]
    LegacyPassword,

    /// Admin user already exists.
    #[error("admin user already exists")]
    UserAlreadyExists,

    /// Admin user not found.
    #[error("admin user not found")]
    UserNotFound,

    /// The credential store could not be reached.
    #[error("credential store unavailable: {0}")]
    Unavailable(#[source] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AdminAuthError {
    /// Message safe to show on the login page.
    ///
    /// Unknown email, wrong password and unmigrated credentials read the same
    /// so the form does not reveal which admin emails exist.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(_) => "Please enter a valid email address".to_string(),
            Self::MissingField(field) => format!("Please enter your {field}"),
            Self::WeakPassword(reason) => format!("Invalid password: {reason}"),
            Self::InvalidCredentials | Self::LegacyPassword | Self::UserNotFound => {
                "Invalid email or password".to_string()
            }
            Self::Unavailable(_) => {
                "Sign-in is temporarily unavailable. Please try again shortly.".to_string()
            }
            Self::UserAlreadyExists => "An admin with that email already exists".to_string(),
            Self::PasswordHash => "Something went wrong. Please try again.".to_string(),
        }
    }
}
