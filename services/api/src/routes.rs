use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use worksim::scoring::{
    score_submission, scoring_router, AssistedGrader, ScoringRepository,
    SimulationScoringService, TaskSubmission, ValidationResult,
};

#[derive(Debug, Serialize)]
pub(crate) struct ScorePreview {
    pub(crate) task_id: String,
    pub(crate) source: &'static str,
    #[serde(flatten)]
    pub(crate) result: ValidationResult,
}

pub(crate) fn with_scoring_routes<R, G>(
    service: Arc<SimulationScoringService<R, G>>,
) -> axum::Router
where
    R: ScoringRepository + 'static,
    G: AssistedGrader + 'static,
{
    scoring_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/score", axum::routing::post(score_preview_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Scores a submission against the loaded rubric without storing it.
pub(crate) async fn score_preview_endpoint(
    Extension(state): Extension<AppState>,
    Json(submission): Json<TaskSubmission>,
) -> Json<ScorePreview> {
    let scored = score_submission(&submission, &state.rubric);
    Json(ScorePreview {
        task_id: submission.task_id.to_string(),
        source: scored.source.label(),
        result: scored.result,
    })
}
