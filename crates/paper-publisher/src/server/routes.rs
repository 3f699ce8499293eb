//! Route table and handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::PipelineError;
use crate::models::{AnalyzeRequest, ResearchRequest};
use crate::pipeline::Publisher;

/// Error reply in the `{"detail": ...}` shape.
#[derive(Debug)]
pub struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        (status, Json(serde_json::json!({ "detail": self.0.to_user_message() }))).into_response()
    }
}

/// Create the HTTP router.
pub fn create_router(publisher: Arc<Publisher>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/research", post(research))
        .route("/analyze", post(analyze))
        .route("/history", get(history))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(publisher)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "paper-publisher",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "AI Research Paper Publisher running."
    }))
}

async fn research(
    State(publisher): State<Arc<Publisher>>,
    Json(req): Json<ResearchRequest>,
) -> Result<Response, ApiError> {
    let report = publisher.research(&req.prompt).await?;
    Ok(Json(report).into_response())
}

async fn analyze(
    State(publisher): State<Arc<Publisher>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Response, ApiError> {
    let report = publisher.analyze(&req).await?;
    Ok(Json(report).into_response())
}

async fn history(State(publisher): State<Arc<Publisher>>) -> Result<Response, ApiError> {
    let report = publisher.history().await.map_err(PipelineError::from)?;
    Ok(Json(report).into_response())
}
