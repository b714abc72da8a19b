use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use quest_model::{ChallengeId, Document, FieldValue, Record};
use tracing::trace;

use crate::{error::StoreError, store::DocumentStore};

/// In-process document store.
///
/// Collections are created lazily on first insert. Each call holds the lock for its whole
/// duration, so single calls are atomic but a get followed by an update is not.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

struct MemoryStoreInner {
    /// Documents indexed by collection, then by id.
    collections: HashMap<String, HashMap<ChallengeId, Record>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryStoreInner {
                collections: HashMap::new(),
            })),
        }
    }

    /// Number of documents in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.read()
            .collections
            .get(collection)
            .map(HashMap::len)
            .unwrap_or_default()
    }

    /// Insert a document under a caller-chosen id, replacing any previous one.
    ///
    /// Useful for seeding records that did not go through the service.
    pub fn insert(&self, collection: &str, id: impl Into<ChallengeId>, fields: Record) {
        self.write()
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.into(), fields);
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryStoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryStoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>, StoreError> {
        let inner = self.read();

        let docs: Vec<Document> = inner
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| fields.get(field) == Some(value))
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn get(
        &self,
        collection: &str,
        id: &ChallengeId,
    ) -> Result<Option<Document>, StoreError> {
        let inner = self.read();

        Ok(inner
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id.clone(), fields.clone())))
    }

    async fn create(&self, collection: &str, fields: Record) -> Result<ChallengeId, StoreError> {
        let id = ChallengeId::from(uuid::Uuid::new_v4().simple().to_string());
        trace!(collection, %id, "memory store insert");

        self.write()
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &ChallengeId,
        fields: Record,
    ) -> Result<(), StoreError> {
        let mut inner = self.write();

        let doc = inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        doc.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &ChallengeId) -> Result<(), StoreError> {
        let mut inner = self.write();

        if let Some(docs) = inner.collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = "challenges";

    fn record(user: &str, progress: i64) -> Record {
        let mut fields = Record::new();
        fields.insert("user_id".to_string(), FieldValue::from(user));
        fields.insert("progress".to_string(), FieldValue::from(progress));
        fields
    }

    #[tokio::test]
    async fn create_assigns_unique_ids() {
        let store = MemoryStore::new();

        let a = store.create(COLLECTION, record("u1", 0)).await.unwrap();
        let b = store.create(COLLECTION, record("u1", 0)).await.unwrap();

        assert_ne!(a, b);
        assert!(!a.is_blank());
        assert_eq!(store.len(COLLECTION), 2);
    }

    #[tokio::test]
    async fn get_returns_stored_fields() {
        let store = MemoryStore::new();
        let id = store.create(COLLECTION, record("u1", 4)).await.unwrap();

        let doc = store
            .get(COLLECTION, &id)
            .await
            .unwrap()
            .expect("document should exist");
        assert_eq!(doc.id, id);
        assert_eq!(doc.fields.get("progress"), Some(&FieldValue::Integer(4)));
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = MemoryStore::new();
        let doc = store
            .get(COLLECTION, &ChallengeId::from("nope"))
            .await
            .unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn query_eq_filters_by_field() {
        let store = MemoryStore::new();
        store.create(COLLECTION, record("u1", 0)).await.unwrap();
        store.create(COLLECTION, record("u1", 1)).await.unwrap();
        store.create(COLLECTION, record("u2", 0)).await.unwrap();

        let docs = store
            .query_eq(COLLECTION, "user_id", &FieldValue::from("u1"))
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);

        let docs = store
            .query_eq(COLLECTION, "user_id", &FieldValue::from("u3"))
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryStore::new();
        store.create("a", record("u1", 0)).await.unwrap();

        let docs = store
            .query_eq("b", "user_id", &FieldValue::from("u1"))
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = MemoryStore::new();
        let id = store.create(COLLECTION, record("u1", 0)).await.unwrap();

        let mut patch = Record::new();
        patch.insert("progress".to_string(), FieldValue::from(3));
        store.update(COLLECTION, &id, patch).await.unwrap();

        let doc = store.get(COLLECTION, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields.get("progress"), Some(&FieldValue::Integer(3)));
        assert_eq!(doc.fields.get("user_id"), Some(&FieldValue::from("u1")));
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update(COLLECTION, &ChallengeId::from("ghost"), Record::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn delete_removes_and_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.create(COLLECTION, record("u1", 0)).await.unwrap();

        store.delete(COLLECTION, &id).await.unwrap();
        assert!(store.get(COLLECTION, &id).await.unwrap().is_none());

        store.delete(COLLECTION, &id).await.unwrap();
        assert_eq!(store.len(COLLECTION), 0);
    }

    #[tokio::test]
    async fn insert_seeds_under_given_id() {
        let store = MemoryStore::new();
        store.insert(COLLECTION, "fixed", record("u9", 1));

        let doc = store
            .get(COLLECTION, &ChallengeId::from("fixed"))
            .await
            .unwrap();
        assert!(doc.is_some());
    }
}
