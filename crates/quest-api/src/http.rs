use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use quest_model::{ChallengeId, NewChallenge};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET /get_challenges?user_id= - List a user's challenges
    /// - POST /add_challenge - Create challenge
    /// - POST /update_progress/{challenge_id}?progress= - Add progress
    /// - GET /get_progress/{challenge_id} - Read progress and target
    /// - DELETE /delete_challenge/{challenge_id} - Delete challenge
    /// - GET /health - Liveness check
    ///
    /// Every route accepts requests from any origin.
    pub fn router(self) -> Router {
        Router::new()
            .route("/get_challenges", get(list_challenges::<H>))
            .route("/add_challenge", post(add_challenge::<H>))
            .route(
                "/update_progress/{challenge_id}",
                post(update_progress::<H>),
            )
            .route("/get_progress/{challenge_id}", get(get_progress::<H>))
            .route(
                "/delete_challenge/{challenge_id}",
                delete(delete_challenge::<H>),
            )
            .route("/health", get(health))
            .layer(cors_layer())
            .with_state(self.handler)
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListChallengesParams {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct UpdateProgressParams {
    /// Amount to add; negative values are rejected.
    progress: i64,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /get_challenges?user_id=
async fn list_challenges<H>(
    State(handler): State<Arc<H>>,
    params: Result<Query<ListChallengesParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let Query(params) = params.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    debug!(user_id = %params.user_id, "listing challenges");

    let challenges = handler.list_challenges(&params.user_id).await?;
    debug!(count = challenges.len(), "challenges listed");

    Ok(Json(challenges))
}

/// POST /add_challenge
async fn add_challenge<H>(
    State(handler): State<Arc<H>>,
    req: Result<Json<NewChallenge>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let Json(req) = req.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    debug!(user_id = %req.user_id, goal = req.target, "adding challenge");

    let challenge = handler.add_challenge(req).await?;

    Ok((StatusCode::CREATED, Json(challenge)))
}

/// POST /update_progress/{challenge_id}?progress=
async fn update_progress<H>(
    State(handler): State<Arc<H>>,
    challenge_id: Result<Path<String>, PathRejection>,
    params: Result<Query<UpdateProgressParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let Query(params) = params.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let id = challenge_path(challenge_id)?;
    debug!(challenge_id = %id, delta = params.progress, "updating progress");

    let update = handler.update_progress(&id, params.progress).await?;

    Ok(Json(update))
}

/// GET /get_progress/{challenge_id}
async fn get_progress<H>(
    State(handler): State<Arc<H>>,
    challenge_id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let id = challenge_path(challenge_id)?;
    debug!(challenge_id = %id, "getting progress");

    let view = handler.get_progress(&id).await?;

    Ok(Json(view))
}

/// DELETE /delete_challenge/{challenge_id}
async fn delete_challenge<H>(
    State(handler): State<Arc<H>>,
    challenge_id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let id = challenge_path(challenge_id)?;
    debug!(challenge_id = %id, "deleting challenge");

    let deleted = handler.delete_challenge(&id).await?;

    Ok(Json(deleted))
}

fn challenge_path(path: Result<Path<String>, PathRejection>) -> Result<ChallengeId, ApiError> {
    let Path(id) = path.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    Ok(ChallengeId::from(id))
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}
