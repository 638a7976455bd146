//! Push delivery client.
//!
//! The mobile app's push relay accepts one POST per broadcast:
//!
//! ```json
//! { "title": "...", "text": "...", "users": [{ "deviceToken": "..." }] }
//! ```
//!
//! Delivery is best effort. Callers treat every error as a warning.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::config::PushConfig;

/// Errors that can occur when calling the push relay.
#[derive(Debug, Error)]
pub enum PushError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Relay returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PushRecipient<'a> {
    device_token: &'a str,
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    title: &'a str,
    text: &'a str,
    users: Vec<PushRecipient<'a>>,
}

/// Push relay client.
#[derive(Clone)]
pub struct PushClient {
    inner: Arc<PushClientInner>,
}

struct PushClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl PushClient {
    /// Create a new push client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PushConfig) -> Result<Self, PushError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            inner: Arc::new(PushClientInner {
                client,
                endpoint: config.endpoint.clone(),
            }),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Send one notification to every token in a single request.
    ///
    /// # Errors
    ///
    /// Returns `PushError` if the request fails or the relay rejects it.
    #[tracing::instrument(skip(self, text, tokens), fields(recipients = tokens.len()))]
    pub async fn send(&self, title: &str, text: &str, tokens: &[String]) -> Result<(), PushError> {
        let body = PushRequest {
            title,
            text,
            users: tokens
                .iter()
                .map(|token| PushRecipient {
                    device_token: token,
                })
                .collect(),
        };

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(PushError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
