use quest_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl ApiError {
    /// Message shown to clients.
    ///
    /// Internal failures are reported generically; details go to the log only.
    pub fn detail(&self) -> String {
        match self {
            ApiError::InvalidRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::Core(CoreError::Store(_) | CoreError::MalformedRecord { .. })
            | ApiError::Internal(_) => "Internal server error".to_string(),
            ApiError::Core(e) => e.to_string(),
        }
    }
}

#[cfg(feature = "http")]
mod response {
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use quest_core::CoreError;
    use serde::Serialize;
    use tracing::error;

    use super::ApiError;

    #[derive(Debug, Serialize)]
    struct ErrorBody {
        detail: String,
    }

    impl ApiError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::Core(CoreError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
                ApiError::Core(e) if e.is_not_found() => StatusCode::NOT_FOUND,
                ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            // Core failures are already logged by the service.
            if let ApiError::Internal(msg) = &self {
                error!(error = %msg, "request failed");
            }

            let body = ErrorBody {
                detail: self.detail(),
            };
            (status, Json(body)).into_response()
        }
    }
}
