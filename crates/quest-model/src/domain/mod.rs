mod challenge_id;
pub use challenge_id::ChallengeId;

mod challenge;
pub use challenge::{Challenge, NewChallenge};

mod progress;
pub use progress::{Deleted, ProgressUpdate, ProgressView};

mod record;
pub use record::{Document, FieldValue, Record};

mod constants;
pub use constants::{
    DEFAULT_COLLECTION, FIELD_DESCRIPTION, FIELD_NAME, FIELD_PROGRESS, FIELD_TARGET, FIELD_USER_ID,
};

/// Identifier of the user owning a challenge.
///
/// Users are not a stored entity; the id only groups challenges.
pub type UserId = String;

/// Non-negative counter used for both `target` and `progress`.
pub type Count = u64;
