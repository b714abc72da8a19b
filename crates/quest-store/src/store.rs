use async_trait::async_trait;
use quest_model::{ChallengeId, Document, FieldValue, Record};

use crate::error::StoreError;

/// Document database client.
///
/// The five primitives the challenge service is built on. Every call touches at most
/// one document (or runs one query) and is assumed atomic on its own; there are no
/// cross-call transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Return every document in `collection` whose `field` equals `value`.
    ///
    /// Order is unspecified.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>, StoreError>;

    /// Fetch a single document, `None` if it does not exist.
    async fn get(&self, collection: &str, id: &ChallengeId) -> Result<Option<Document>, StoreError>;

    /// Insert a document under a store-generated id and return that id.
    async fn create(&self, collection: &str, fields: Record) -> Result<ChallengeId, StoreError>;

    /// Overwrite the given fields of an existing document.
    ///
    /// Fields not present in `fields` are left untouched. Fails with
    /// [`StoreError::NotFound`] if the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &ChallengeId,
        fields: Record,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &ChallengeId) -> Result<(), StoreError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}
