/// Collection holding challenge documents when none is configured.
pub const DEFAULT_COLLECTION: &str = "challenges";

/// Document field names.
pub const FIELD_USER_ID: &str = "user_id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_TARGET: &str = "target";
pub const FIELD_PROGRESS: &str = "progress";
