//! In-process document store.
//!
//! Backs the unit and integration tests. Documents are kept per collection,
//! ordered by id like a Firestore collection listing.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;

use super::{Document, Fields, StoreError, Value, generate_document_id};

type Collection = BTreeMap<String, Fields>;

/// Memory-backed store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    collections: RwLock<HashMap<String, Collection>>,
    offline: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document under a known id.
    pub async fn put(&self, collection: &str, id: &str, fields: Fields) {
        self.inner
            .collections
            .write()
            .await
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), fields);
    }

    /// Simulate an unreachable service: every operation fails while set.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.inner
            .collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "memory store offline".to_string(),
            });
        }
        Ok(())
    }

    fn document(collection: &str, id: &str, fields: &Fields) -> Document {
        Document {
            name: format!("memory/{collection}/{id}"),
            fields: fields.clone(),
            create_time: None,
            update_time: None,
        }
    }

    pub(super) async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.check_online()?;
        let collections = self.inner.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Self::document(collection, id, fields))
                    .collect()
            })
            .unwrap_or_default())
    }

    pub(super) async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.check_online()?;
        let collections = self.inner.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Self::document(collection, id, fields)))
    }

    pub(super) async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        self.check_online()?;
        let collections = self.inner.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| fields.get(field).and_then(Value::as_str) == Some(value))
                    .map(|(id, fields)| Self::document(collection, id, fields))
                    .collect()
            })
            .unwrap_or_default())
    }

    pub(super) async fn update(
        &self,
        collection: &str,
        id: &str,
        set: Fields,
        remove: &[&str],
    ) -> Result<(), StoreError> {
        self.check_online()?;
        let mut collections = self.inner.collections.write().await;
        let fields = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;

        for name in remove {
            fields.remove(*name);
        }
        fields.extend(set);
        Ok(())
    }

    pub(super) async fn insert(
        &self,
        collection: &str,
        mut fields: Fields,
        server_timestamp: Option<&str>,
    ) -> Result<String, StoreError> {
        self.check_online()?;
        if let Some(field) = server_timestamp {
            fields.insert(field.to_owned(), Value::TimestampValue(Utc::now()));
        }

        let id = generate_document_id();
        self.put(collection, &id, fields).await;
        Ok(id)
    }
}
