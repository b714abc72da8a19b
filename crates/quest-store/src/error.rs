use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("invalid store configuration: {0}")]
    Config(String),

    #[cfg(feature = "firestore")]
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode store response: {0}")]
    Decode(String),
}
