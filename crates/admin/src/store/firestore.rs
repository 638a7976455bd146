//! Firestore REST client.
//!
//! # API Reference
//!
//! - Base URL: `https://firestore.googleapis.com/v1/projects/{project}/databases/{db}/documents`
//! - Authentication: OAuth bearer token and/or `key` query parameter
//! - Emulator: plain HTTP against `FIRESTORE_EMULATOR_HOST`, no authentication

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use super::{Document, Fields, StoreError, Value, generate_document_id};
use crate::config::FirestoreConfig;

/// Page size for collection scans.
const LIST_PAGE_SIZE: &str = "300";

/// Firestore REST API client.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    client: reqwest::Client,
    documents_url: String,
    documents_path: String,
    api_key: Option<SecretString>,
    access_token: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

/// One element of the streamed `runQuery` response array.
#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<Document>,
}

#[derive(Debug, Serialize)]
struct PatchBody<'a> {
    fields: &'a Fields,
}

impl FirestoreClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &FirestoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("spot-my-ride-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // The emulator accepts no credentials.
        let (api_key, access_token) = if config.emulator_host.is_some() {
            (None, None)
        } else {
            (config.api_key.clone(), config.access_token.clone())
        };

        Ok(Self {
            inner: Arc::new(FirestoreClientInner {
                client,
                documents_url: config.documents_url(),
                documents_path: config.documents_path(),
                api_key,
                access_token,
            }),
        })
    }

    /// Build a URL below the documents root, with the API key attached.
    fn url(&self, suffix: &str) -> Result<Url, StoreError> {
        let mut url = Url::parse(&format!("{}{suffix}", self.inner.documents_url))
            .map_err(|e| StoreError::InvalidRequest(e.to_string()))?;
        if let Some(key) = &self.inner.api_key {
            url.query_pairs_mut().append_pair("key", key.expose_secret());
        }
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.inner.access_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    fn document_suffix(collection: &str, id: &str) -> String {
        format!("/{collection}/{}", urlencoding::encode(id))
    }

    #[tracing::instrument(skip(self))]
    pub(super) async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.url(&format!("/{collection}"))?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", LIST_PAGE_SIZE);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self.authorize(self.inner.client.get(url)).send().await?;
            let page: ListDocumentsResponse = handle_response(response).await?;
            documents.extend(page.documents);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(collection, count = documents.len(), "Listed documents");
        Ok(documents)
    }

    #[tracing::instrument(skip(self))]
    pub(super) async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let url = self.url(&Self::document_suffix(collection, id))?;
        let response = self.authorize(self.inner.client.get(url)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        handle_response(response).await.map(Some)
    }

    #[tracing::instrument(skip(self, value))]
    pub(super) async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let url = self.url(":runQuery")?;
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": quote_field_path(field) },
                        "op": "EQUAL",
                        "value": Value::string(value),
                    }
                }
            }
        });

        let response = self
            .authorize(self.inner.client.post(url).json(&body))
            .send()
            .await?;
        let items: Vec<RunQueryItem> = handle_response(response).await?;

        Ok(items.into_iter().filter_map(|item| item.document).collect())
    }

    #[tracing::instrument(skip(self, set))]
    pub(super) async fn update(
        &self,
        collection: &str,
        id: &str,
        set: Fields,
        remove: &[&str],
    ) -> Result<(), StoreError> {
        let mut url = self.url(&Self::document_suffix(collection, id))?;
        {
            let mut query = url.query_pairs_mut();
            for field in set.keys().map(String::as_str).chain(remove.iter().copied()) {
                query.append_pair("updateMask.fieldPaths", &quote_field_path(field));
            }
            query.append_pair("currentDocument.exists", "true");
        }

        let response = self
            .authorize(self.inner.client.patch(url).json(&PatchBody { fields: &set }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{collection}/{id}")));
        }

        let _: Document = handle_response(response).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, fields))]
    pub(super) async fn insert(
        &self,
        collection: &str,
        fields: Fields,
        server_timestamp: Option<&str>,
    ) -> Result<String, StoreError> {
        let id = generate_document_id();
        let url = self.url(":commit")?;

        let transforms: Vec<serde_json::Value> = server_timestamp
            .map(|field| {
                json!({
                    "fieldPath": quote_field_path(field),
                    "setToServerValue": "REQUEST_TIME",
                })
            })
            .into_iter()
            .collect();

        let body = json!({
            "writes": [{
                "update": {
                    "name": format!("{}/{collection}/{id}", self.inner.documents_path),
                    "fields": fields,
                },
                "currentDocument": { "exists": false },
                "updateTransforms": transforms,
            }]
        });

        let response = self
            .authorize(self.inner.client.post(url).json(&body))
            .send()
            .await?;
        let _: serde_json::Value = handle_response(response).await?;

        Ok(id)
    }
}

/// Quote a field path segment unless it is a plain identifier.
fn quote_field_path(field: &str) -> String {
    let mut chars = field.chars();
    let simple = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if simple {
        field.to_owned()
    } else {
        format!("`{}`", field.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

/// Handle API response and parse JSON.
async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StoreError> {
    let status = response.status();

    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("Failed to parse response: {e}")));
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}
