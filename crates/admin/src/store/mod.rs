//! Remote document store access.
//!
//! All application data lives in a Firestore database owned by the mobile
//! app. This module speaks its REST API (see [`firestore`]) and offers an
//! in-process backend with the same operations (see [`memory`]) for tests
//! and local development.
//!
//! # Collections
//!
//! | Collection      | Contents                                        |
//! |-----------------|-------------------------------------------------|
//! | `admin`         | Staff credentials                               |
//! | `users`         | End-user accounts                               |
//! | `myCars`        | Vehicles, keyed to an account by `userId`       |
//! | `pinnedCars`    | Pinned parking locations with a vehicle snapshot |
//! | `Subscriptions` | Purchases, keyed by `userId2` or `userId`       |
//! | `notifications` | One document per recipient per broadcast        |

pub mod firestore;
pub mod memory;
pub mod value;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use firestore::FirestoreClient;
pub use memory::MemoryStore;
pub use value::{Fields, FieldsExt, Value};

/// Collection names as used by the mobile application.
pub mod collections {
    pub const ADMIN: &str = "admin";
    pub const USERS: &str = "users";
    pub const VEHICLES: &str = "myCars";
    pub const PINS: &str = "pinnedCars";
    pub const SUBSCRIPTIONS: &str = "Subscriptions";
    pub const NOTIFICATIONS: &str = "notifications";
}

/// Errors raised by a document store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The targeted document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// A response could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name; the last segment is the document id.
    pub name: String,
    #[serde(default)]
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

impl Document {
    /// The document id (last path segment of `name`).
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Document store handle.
///
/// Cheap to clone; both backends share their state behind an `Arc`.
#[derive(Clone)]
pub enum DocumentStore {
    Firestore(FirestoreClient),
    Memory(MemoryStore),
}

impl DocumentStore {
    /// Every document in a collection, following pagination to the end.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if any page request fails.
    pub async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        match self {
            Self::Firestore(client) => client.list(collection).await,
            Self::Memory(store) => store.list(collection).await,
        }
    }

    /// A single document, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the request fails.
    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        match self {
            Self::Firestore(client) => client.get(collection, id).await,
            Self::Memory(store) => store.get(collection, id).await,
        }
    }

    /// All documents whose string field `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        match self {
            Self::Firestore(client) => client.find_by_field(collection, field, value).await,
            Self::Memory(store) => store.find_by_field(collection, field, value).await,
        }
    }

    /// Update fields of an existing document.
    ///
    /// Fields named in `remove` are deleted. The document must already exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        set: Fields,
        remove: &[&str],
    ) -> Result<(), StoreError> {
        match self {
            Self::Firestore(client) => client.update(collection, id, set, remove).await,
            Self::Memory(store) => store.update(collection, id, set, remove).await,
        }
    }

    /// Update one field of an existing document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    pub async fn update_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut set = Fields::new();
        set.insert(field.to_owned(), value);
        self.update(collection, id, set, &[]).await
    }

    /// Create a document with a generated id and return that id.
    ///
    /// When `server_timestamp` names a field, the store fills it with its own
    /// commit time.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub async fn insert(
        &self,
        collection: &str,
        fields: Fields,
        server_timestamp: Option<&str>,
    ) -> Result<String, StoreError> {
        match self {
            Self::Firestore(client) => client.insert(collection, fields, server_timestamp).await,
            Self::Memory(store) => store.insert(collection, fields, server_timestamp).await,
        }
    }
}

/// Generate a document id in the style of client-side auto ids.
pub(crate) fn generate_document_id() -> String {
    let simple = uuid::Uuid::new_v4().simple().to_string();
    simple.chars().take(20).collect()
}
