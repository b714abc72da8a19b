/// Public Firestore REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com";

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "(default)";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Connection settings for [`FirestoreStore`](super::FirestoreStore).
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Scheme and host of the REST API, without a trailing path.
    pub endpoint: String,
    pub project_id: String,
    pub database: String,
    /// OAuth2 bearer token. Emulators accept unauthenticated requests.
    pub token: Option<String>,
    pub timeout_ms: u64,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Point the client at a local emulator (`host:port`).
    pub fn with_emulator(mut self, host: &str) -> Self {
        self.endpoint = format!("http://{host}");
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Root of the document tree: `{endpoint}/v1/projects/{project}/databases/{db}/documents`.
    pub fn documents_root(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            self.endpoint.trim_end_matches('/'),
            self.project_id,
            self.database
        )
    }
}
