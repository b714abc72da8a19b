use async_trait::async_trait;
use quest_model::{Challenge, ChallengeId, Deleted, NewChallenge, ProgressUpdate, ProgressView};

use crate::error::ApiError;

/// Challenge API handler.
///
/// This trait abstracts the backend implementation, allowing users to:
/// - Use the provided `ServiceApiAdapter`
/// - Implement custom handlers with additional logic (auth, auditing, etc.)
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// List every challenge owned by a user.
    async fn list_challenges(&self, user_id: &str) -> Result<Vec<Challenge>, ApiError>;

    /// Create a challenge with zero progress.
    async fn add_challenge(&self, req: NewChallenge) -> Result<Challenge, ApiError>;

    /// Add a non-negative delta to a challenge's progress.
    async fn update_progress(
        &self,
        id: &ChallengeId,
        delta: i64,
    ) -> Result<ProgressUpdate, ApiError>;

    /// Read name, progress and target of a challenge.
    async fn get_progress(&self, id: &ChallengeId) -> Result<ProgressView, ApiError>;

    /// Delete a challenge.
    async fn delete_challenge(&self, id: &ChallengeId) -> Result<Deleted, ApiError>;
}
