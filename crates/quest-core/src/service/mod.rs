use std::{future::Future, sync::Arc, time::Instant};

use quest_model::{
    Challenge, ChallengeId, Count, DEFAULT_COLLECTION, Deleted, FIELD_USER_ID, FieldValue,
    NewChallenge, ProgressUpdate, ProgressView,
};
use quest_store::{DocumentStore, StoreError};
use tracing::{debug, error, info, instrument};

use crate::{
    error::CoreError,
    mapper::{new_record, progress_patch, to_challenge},
    metrics::{MetricsBackend, NoopMetrics, Operation},
    progress::advance,
};

/// Challenge operations over an injected document store.
///
/// The service keeps no state of its own: every call is at most one query or one
/// read followed by one write. Progress updates read and then write without a
/// concurrency token, so two concurrent updates of the same challenge may lose one
/// increment.
pub struct ChallengeService {
    store: Arc<dyn DocumentStore>,
    collection: String,
    metrics: Arc<dyn MetricsBackend>,
}

impl ChallengeService {
    /// Create a service over `store` using the default collection and no metrics.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            collection: DEFAULT_COLLECTION.to_string(),
            metrics: Arc::new(NoopMetrics),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsBackend>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// All challenges owned by `user_id`, in store order.
    ///
    /// An owner without challenges is reported as [`CoreError::NoChallengesForUser`].
    pub async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Challenge>, CoreError> {
        self.observe(Operation::List, self.list_inner(user_id))
            .await
    }

    /// Insert a new challenge with zero progress.
    pub async fn create(&self, req: NewChallenge) -> Result<Challenge, CoreError> {
        self.observe(Operation::Create, self.create_inner(req))
            .await
    }

    /// Add `delta` to the stored progress, capped at the target, and return the result.
    pub async fn update_progress(
        &self,
        id: &ChallengeId,
        delta: i64,
    ) -> Result<ProgressUpdate, CoreError> {
        self.observe(Operation::UpdateProgress, self.update_inner(id, delta))
            .await
    }

    /// Name, progress and target of a challenge.
    pub async fn get_progress(&self, id: &ChallengeId) -> Result<ProgressView, CoreError> {
        self.observe(Operation::GetProgress, self.progress_inner(id))
            .await
    }

    /// Delete a challenge that exists.
    pub async fn delete(&self, id: &ChallengeId) -> Result<Deleted, CoreError> {
        self.observe(Operation::Delete, self.delete_inner(id)).await
    }

    async fn observe<T, F>(&self, op: Operation, fut: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        let started = Instant::now();
        let result = fut.await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e @ (CoreError::Store(_) | CoreError::MalformedRecord { .. })) => {
                error!(%op, error = %e, "challenge operation failed");
                e.kind()
            }
            Err(e) => {
                debug!(%op, error = %e, "challenge operation rejected");
                e.kind()
            }
        };
        self.metrics.record_operation(op, outcome, started.elapsed());
        result
    }

    #[instrument(level = "debug", skip(self))]
    async fn list_inner(&self, user_id: &str) -> Result<Vec<Challenge>, CoreError> {
        ensure_owner(user_id)?;

        let docs = self
            .store
            .query_eq(&self.collection, FIELD_USER_ID, &FieldValue::from(user_id))
            .await?;
        if docs.is_empty() {
            return Err(CoreError::NoChallengesForUser(user_id.to_string()));
        }

        let challenges = docs
            .iter()
            .map(to_challenge)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = challenges.len(), "challenges listed");
        Ok(challenges)
    }

    #[instrument(level = "debug", skip(self, req), fields(user_id = %req.user_id))]
    async fn create_inner(&self, req: NewChallenge) -> Result<Challenge, CoreError> {
        ensure_owner(&req.user_id)?;
        let target = Count::try_from(req.target)
            .map_err(|_| CoreError::invalid("target cannot be negative"))?;

        let fields = new_record(&req.user_id, &req.name, &req.description, target);
        let id = self.store.create(&self.collection, fields).await?;
        info!(%id, goal = target, "challenge created");

        Ok(Challenge {
            id,
            user_id: req.user_id,
            name: req.name,
            description: req.description,
            target,
            progress: 0,
        })
    }

    #[instrument(level = "debug", skip(self, id), fields(challenge_id = %id))]
    async fn update_inner(
        &self,
        id: &ChallengeId,
        delta: i64,
    ) -> Result<ProgressUpdate, CoreError> {
        let delta = Count::try_from(delta)
            .map_err(|_| CoreError::invalid("Progress cannot be negative"))?;
        let challenge = self.fetch(id).await?;

        let progress = advance(challenge.progress, delta, challenge.target);
        self.store
            .update(&self.collection, id, progress_patch(progress))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => CoreError::ChallengeNotFound(id.clone()),
                other => CoreError::Store(other),
            })?;
        info!(
            previous = challenge.progress,
            progress,
            goal = challenge.target,
            "challenge progress updated"
        );

        Ok(ProgressUpdate {
            message: format!("Progress updated for challenge {id}!"),
            progress,
        })
    }

    #[instrument(level = "debug", skip(self, id), fields(challenge_id = %id))]
    async fn progress_inner(&self, id: &ChallengeId) -> Result<ProgressView, CoreError> {
        let challenge = self.fetch(id).await?;

        Ok(ProgressView {
            challenge: challenge.name,
            progress: challenge.progress,
            target: challenge.target,
        })
    }

    #[instrument(level = "debug", skip(self, id), fields(challenge_id = %id))]
    async fn delete_inner(&self, id: &ChallengeId) -> Result<Deleted, CoreError> {
        self.ensure_addressable(id)?;
        if self.store.get(&self.collection, id).await?.is_none() {
            return Err(CoreError::ChallengeNotFound(id.clone()));
        }

        self.store.delete(&self.collection, id).await?;
        info!("challenge deleted");

        Ok(Deleted {
            message: format!("Desafío con ID {id} eliminado"),
        })
    }

    /// Load and map a challenge, failing if it does not exist.
    async fn fetch(&self, id: &ChallengeId) -> Result<Challenge, CoreError> {
        self.ensure_addressable(id)?;
        let doc = self
            .store
            .get(&self.collection, id)
            .await?
            .ok_or_else(|| CoreError::ChallengeNotFound(id.clone()))?;
        to_challenge(&doc)
    }

    fn ensure_addressable(&self, id: &ChallengeId) -> Result<(), CoreError> {
        if id.is_blank() {
            return Err(CoreError::invalid("challenge_id cannot be empty"));
        }
        Ok(())
    }
}

/// Records with a blank owner could never be listed, so both sides reject them.
fn ensure_owner(user_id: &str) -> Result<(), CoreError> {
    if user_id.trim().is_empty() {
        return Err(CoreError::invalid("user_id cannot be empty"));
    }
    Ok(())
}
