use serde::{Deserialize, Serialize};

use crate::{ChallengeId, Count, UserId};

/// A user-owned goal with a numeric target and the progress made towards it.
///
/// Invariant: `progress <= target` after every successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Store-assigned identifier.
    pub id: ChallengeId,
    /// Owner of the challenge.
    pub user_id: UserId,
    /// Short human-readable title.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Value at which the challenge is complete.
    pub target: Count,
    /// Accumulated progress, capped at `target`.
    pub progress: Count,
}

/// Request to create a challenge.
///
/// `target` is signed so that a negative value reaches validation instead of failing
/// deserialization. Any `progress` supplied by the caller is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChallenge {
    pub user_id: UserId,
    pub name: String,
    pub description: String,
    pub target: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_wire_shape_uses_snake_case() {
        let challenge = Challenge {
            id: ChallengeId::from("c1"),
            user_id: "u1".to_string(),
            name: "Run 5k".to_string(),
            description: "three times a week".to_string(),
            target: 5,
            progress: 2,
        };

        let json = serde_json::to_value(&challenge).unwrap();
        assert_eq!(json["id"], "c1");
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["target"], 5);
        assert_eq!(json["progress"], 2);
    }

    #[test]
    fn new_challenge_ignores_progress_member() {
        let body = r#"{"user_id":"u1","name":"Read","description":"books","target":12,"progress":7}"#;
        let req: NewChallenge = serde_json::from_str(body).unwrap();
        assert_eq!(req.target, 12);
        assert_eq!(req.user_id, "u1");
    }

    #[test]
    fn new_challenge_accepts_negative_target_for_later_validation() {
        let body = r#"{"user_id":"u1","name":"x","description":"y","target":-1}"#;
        let req: NewChallenge = serde_json::from_str(body).unwrap();
        assert_eq!(req.target, -1);
    }
}
