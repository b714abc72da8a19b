use serde::{Deserialize, Serialize};

use crate::Count;

/// Read-only projection returned by the progress query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    /// Challenge name.
    pub challenge: String,
    pub progress: Count,
    pub target: Count,
}

/// Outcome of a progress update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub message: String,
    /// Stored progress after clamping.
    pub progress: Count,
}

/// Confirmation of a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub message: String,
}
