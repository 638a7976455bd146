//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! smr-cli admin create -e admin@spotmyride.app -n "Admin Name"
//! smr-cli admin set-password -e admin@spotmyride.app
//! echo -n 'correct horse' | smr-cli admin hash-password
//! ```
//!
//! # Environment Variables
//!
//! - `FIRESTORE_PROJECT_ID` - Project that owns the document database
//! - `FIRESTORE_API_KEY` / `FIRESTORE_ACCESS_TOKEN` - Credentials (optional)
//! - `FIRESTORE_EMULATOR_HOST` - Local emulator `host:port` (optional)

use std::io::BufRead;

use secrecy::{ExposeSecret, SecretString};
use spot_my_ride_admin::config::{ConfigError, FirestoreConfig};
use spot_my_ride_admin::services::auth::{self, AdminAuthError, AdminAuthService};
use spot_my_ride_admin::store::{DocumentStore, FirestoreClient, StoreError};
use spot_my_ride_core::{Email, EmailError};
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database settings are missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Reading the password from stdin failed.
    #[error("Could not read password: {0}")]
    Io(#[from] std::io::Error),

    /// No password on the command line or stdin.
    #[error("No password given")]
    EmptyPassword,

    /// The account operation was refused.
    #[error("{0}")]
    Auth(#[from] AdminAuthError),
}

/// Use the `--password` argument, or read one line from stdin.
pub fn resolve_password(arg: Option<String>) -> Result<SecretString, AdminError> {
    let raw = match arg {
        Some(password) => password,
        None => {
            tracing::info!("Reading password from stdin...");
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line
        }
    };
    let password = raw.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(AdminError::EmptyPassword);
    }
    Ok(SecretString::from(password.to_owned()))
}

fn connect() -> Result<DocumentStore, AdminError> {
    dotenvy::dotenv().ok();
    let config = FirestoreConfig::from_env()?;
    tracing::info!("Connecting to project {}...", config.project_id);
    Ok(DocumentStore::Firestore(FirestoreClient::new(&config)?))
}

/// Create a new admin account.
///
/// # Returns
///
/// The document id of the created admin.
pub async fn create_user(
    email: &str,
    name: &str,
    password: &SecretString,
) -> Result<String, AdminError> {
    let email = Email::parse(email)?;
    let store = connect()?;

    tracing::info!("Creating admin user: {}", email);
    let admin = AdminAuthService::new(&store)
        .create_admin(&email, name.trim(), password.expose_secret())
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        admin.id,
        admin.email
    );
    Ok(admin.id.to_string())
}

/// Replace an admin's password.
pub async fn set_password(email: &str, password: &SecretString) -> Result<(), AdminError> {
    let email = Email::parse(email)?;
    let store = connect()?;

    AdminAuthService::new(&store)
        .set_password(&email, password.expose_secret())
        .await?;

    tracing::info!("Password updated for {}", email);
    Ok(())
}

/// Print the Argon2id PHC string for a password.
#[allow(clippy::print_stdout)]
pub fn print_hash(password: &SecretString) -> Result<(), AdminError> {
    auth::validate_password(password.expose_secret())?;
    let hash = auth::hash_password(password.expose_secret())?;
    println!("{hash}");
    Ok(())
}
