mod codec;
mod config;

pub use config::FirestoreConfig;

use std::time::Duration;

use async_trait::async_trait;
use quest_model::{ChallengeId, Document, FieldValue, Record};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use tracing::{debug, trace};

use crate::{error::StoreError, store::DocumentStore};
use codec::{
    RunQueryItem, WireDocument, WriteDocument, decode_document, document_id, equality_query,
};

/// Document store backed by the Firestore v1 REST API.
pub struct FirestoreStore {
    client: reqwest::Client,
    config: FirestoreConfig,
    documents: Url,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Result<Self, StoreError> {
        if config.project_id.trim().is_empty() {
            return Err(StoreError::Config("firestore project id is empty".into()));
        }

        let root = config.documents_root();
        let documents = Url::parse(&root)
            .map_err(|e| StoreError::Config(format!("invalid endpoint '{root}': {e}")))?;
        if documents.cannot_be_a_base() {
            return Err(StoreError::Config(format!(
                "endpoint '{}' cannot carry a path",
                config.endpoint
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config,
            documents,
        })
    }

    fn collection_url(&self, collection: &str) -> Url {
        let mut url = self.documents.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(collection);
        }
        url
    }

    fn document_url(&self, collection: &str, id: &ChallengeId) -> Url {
        let mut url = self.collection_url(collection);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id.as_str());
        }
        url
    }

    fn run_query_url(&self) -> Url {
        let mut url = self.documents.clone();
        let path = format!("{}:runQuery", url.path());
        url.set_path(&path);
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        trace!(%method, %url, "firestore request");
        let builder = self.client.request(method, url);
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Firestore ids are single path segments and may not be `.` or `..`.
fn is_addressable(id: &ChallengeId) -> bool {
    let id = id.as_str();
    !id.trim().is_empty() && !id.contains('/') && id != "." && id != ".."
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>, StoreError> {
        let body = equality_query(collection, field, value);
        let response = self
            .request(Method::POST, self.run_query_url())
            .json(&body)
            .send()
            .await?;

        let items: Vec<RunQueryItem> = check(response).await?.json().await?;
        let docs = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(decode_document)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(collection, field, count = docs.len(), "firestore query");
        Ok(docs)
    }

    async fn get(
        &self,
        collection: &str,
        id: &ChallengeId,
    ) -> Result<Option<Document>, StoreError> {
        if !is_addressable(id) {
            return Ok(None);
        }

        let response = self
            .request(Method::GET, self.document_url(collection, id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let wire: WireDocument = check(response).await?.json().await?;
        decode_document(wire).map(Some)
    }

    async fn create(&self, collection: &str, fields: Record) -> Result<ChallengeId, StoreError> {
        let response = self
            .request(Method::POST, self.collection_url(collection))
            .json(&WriteDocument::from_record(&fields))
            .send()
            .await?;

        let wire: WireDocument = check(response).await?.json().await?;
        let id = document_id(&wire.name)?;
        debug!(collection, %id, "firestore document created");
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &ChallengeId,
        fields: Record,
    ) -> Result<(), StoreError> {
        if !is_addressable(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let mut url = self.document_url(collection, id);
        {
            let mut query = url.query_pairs_mut();
            for name in fields.keys() {
                query.append_pair("updateMask.fieldPaths", name);
            }
            query.append_pair("currentDocument.exists", "true");
        }

        let response = self
            .request(Method::PATCH, url)
            .json(&WriteDocument::from_record(&fields))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }

        check(response).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &ChallengeId) -> Result<(), StoreError> {
        if !is_addressable(id) {
            return Ok(());
        }

        let response = self
            .request(Method::DELETE, self.document_url(collection, id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        check(response).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "firestore"
    }
}

#[cfg(test)]
mod tests;
