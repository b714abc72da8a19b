use quest_model::ChallengeId;
use quest_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Challenge not found")]
    ChallengeNotFound(ChallengeId),

    #[error("No challenges found for this user")]
    NoChallengesForUser(String),

    #[error("malformed record {id}: field '{field}' {reason}")]
    MalformedRecord {
        id: ChallengeId,
        field: &'static str,
        reason: String,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        CoreError::InvalidInput(msg.into())
    }

    /// Returns `true` for both unknown ids and empty owner listings.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ChallengeNotFound(_) | CoreError::NoChallengesForUser(_)
        )
    }

    /// Stable label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "invalid_input",
            CoreError::ChallengeNotFound(_) | CoreError::NoChallengesForUser(_) => "not_found",
            CoreError::MalformedRecord { .. } => "malformed_record",
            CoreError::Store(_) => "store",
        }
    }
}
