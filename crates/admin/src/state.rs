//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::config::AdminConfig;
use crate::middleware::SessionSigner;
use crate::services::push::{PushClient, PushError};
use crate::services::users::UserDirectory;
use crate::store::{DocumentStore, FirestoreClient, StoreError};

/// Errors building the application state at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("document store: {0}")]
    Store(#[from] StoreError),

    #[error("push client: {0}")]
    Push(#[from] PushError),
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: DocumentStore,
    push: Option<PushClient>,
    sessions: SessionSigner,
    users: UserDirectory,
}

impl AppState {
    /// Assemble state from already-built clients.
    #[must_use]
    pub fn new(config: AdminConfig, store: DocumentStore, push: Option<PushClient>) -> Self {
        let sessions = SessionSigner::new(&config.session_secret);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                push,
                sessions,
                users: UserDirectory::new(),
            }),
        }
    }

    /// Build the Firestore and push clients described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if either HTTP client fails to build.
    pub fn connect(config: AdminConfig) -> Result<Self, StateError> {
        let store = DocumentStore::Firestore(FirestoreClient::new(&config.firestore)?);
        let push = config.push().map(PushClient::new).transpose()?;
        Ok(Self::new(config, store, push))
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    #[must_use]
    pub fn push(&self) -> Option<&PushClient> {
        self.inner.push.as_ref()
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionSigner {
        &self.inner.sessions
    }

    /// Last loaded user view.
    #[must_use]
    pub fn users(&self) -> &UserDirectory {
        &self.inner.users
    }
}
