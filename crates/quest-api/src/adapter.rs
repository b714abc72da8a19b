use std::sync::Arc;

use async_trait::async_trait;
use quest_core::ChallengeService;
use quest_model::{Challenge, ChallengeId, Deleted, NewChallenge, ProgressUpdate, ProgressView};

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Adapter that bridges `ChallengeService` to `ApiHandler`.
///
/// This is a ready-to-use implementation that directly delegates to `ChallengeService`.
pub struct ServiceApiAdapter {
    service: Arc<ChallengeService>,
}

impl ServiceApiAdapter {
    /// Create a new adapter wrapping the given service.
    pub fn new(service: Arc<ChallengeService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ApiHandler for ServiceApiAdapter {
    async fn list_challenges(&self, user_id: &str) -> Result<Vec<Challenge>, ApiError> {
        self.service
            .list_by_owner(user_id)
            .await
            .map_err(ApiError::from)
    }

    async fn add_challenge(&self, req: NewChallenge) -> Result<Challenge, ApiError> {
        self.service.create(req).await.map_err(ApiError::from)
    }

    async fn update_progress(
        &self,
        id: &ChallengeId,
        delta: i64,
    ) -> Result<ProgressUpdate, ApiError> {
        self.service
            .update_progress(id, delta)
            .await
            .map_err(ApiError::from)
    }

    async fn get_progress(&self, id: &ChallengeId) -> Result<ProgressView, ApiError> {
        self.service.get_progress(id).await.map_err(ApiError::from)
    }

    async fn delete_challenge(&self, id: &ChallengeId) -> Result<Deleted, ApiError> {
        self.service.delete(id).await.map_err(ApiError::from)
    }
}
