use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{SessionKey, TaskId, TaskSubmission};
use super::grader::AssistedGrader;
use super::repository::{RepositoryError, ScoringRepository};
use super::service::{ScoringServiceError, SimulationScoringService};

const SESSION_PREFIX: &str = "/api/v1/sessions/:user_id/:simulation_id/:session_id";

#[derive(Debug, Deserialize)]
pub(crate) struct SessionPath {
    user_id: String,
    simulation_id: String,
    session_id: String,
}

impl SessionPath {
    fn key(self) -> SessionKey {
        SessionKey::new(self.user_id, self.simulation_id, self.session_id)
    }

    #[cfg(test)]
    pub(crate) fn for_key(key: &SessionKey) -> Self {
        Self {
            user_id: key.user_id.clone(),
            simulation_id: key.simulation_id.clone(),
            session_id: key.session_id.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskPath {
    user_id: String,
    simulation_id: String,
    session_id: String,
    task_id: String,
}

impl TaskPath {
    fn split(self) -> (SessionKey, TaskId) {
        (
            SessionKey::new(self.user_id, self.simulation_id, self.session_id),
            TaskId(self.task_id),
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    option_id: String,
}

/// Router builder exposing submission, progress, decision-loop and report endpoints.
pub fn scoring_router<R, G>(service: Arc<SimulationScoringService<R, G>>) -> Router
where
    R: ScoringRepository + 'static,
    G: AssistedGrader + 'static,
{
    Router::new()
        .route(
            &format!("{SESSION_PREFIX}/submissions"),
            post(submit_handler::<R, G>),
        )
        .route(
            &format!("{SESSION_PREFIX}/results/:task_id"),
            get(result_handler::<R, G>),
        )
        .route(
            &format!("{SESSION_PREFIX}/progress"),
            get(progress_handler::<R, G>),
        )
        .route(
            &format!("{SESSION_PREFIX}/decisions/:task_id"),
            get(decision_state_handler::<R, G>).post(decide_handler::<R, G>),
        )
        .route(
            &format!("{SESSION_PREFIX}/report"),
            get(report_handler::<R, G>),
        )
        .with_state(service)
}

fn error_response(error: ScoringServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R, G>(
    State(service): State<Arc<SimulationScoringService<R, G>>>,
    Path(path): Path<SessionPath>,
    axum::Json(submission): axum::Json<TaskSubmission>,
) -> Response
where
    R: ScoringRepository + 'static,
    G: AssistedGrader + 'static,
{
    match service.submit(&path.key(), submission) {
        Ok(outcome) => {
            let payload = json!({
                "result": outcome.record.view(),
                "breakdown": outcome.record.result.breakdown,
                "progress": outcome.progress,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn result_handler<R, G>(
    State(service): State<Arc<SimulationScoringService<R, G>>>,
    Path(path): Path<TaskPath>,
) -> Response
where
    R: ScoringRepository + 'static,
    G: AssistedGrader + 'static,
{
    let (session, task_id) = path.split();
    match service.result(&session, &task_id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn progress_handler<R, G>(
    State(service): State<Arc<SimulationScoringService<R, G>>>,
    Path(path): Path<SessionPath>,
) -> Response
where
    R: ScoringRepository + 'static,
    G: AssistedGrader + 'static,
{
    match service.progress(&path.key()) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(ScoringServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "completed_task_ids": [],
                "percentage": 0,
                "final_score": serde_json::Value::Null,
                "skill_breakdown": serde_json::Value::Null,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_state_handler<R, G>(
    State(service): State<Arc<SimulationScoringService<R, G>>>,
    Path(path): Path<TaskPath>,
) -> Response
where
    R: ScoringRepository + 'static,
    G: AssistedGrader + 'static,
{
    let (session, task_id) = path.split();
    match service.decision_state(&session, &task_id) {
        Ok(state) => (StatusCode::OK, axum::Json(state)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decide_handler<R, G>(
    State(service): State<Arc<SimulationScoringService<R, G>>>,
    Path(path): Path<TaskPath>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    R: ScoringRepository + 'static,
    G: AssistedGrader + 'static,
{
    let (session, task_id) = path.split();
    match service.decide(&session, &task_id, &request.option_id) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R, G>(
    State(service): State<Arc<SimulationScoringService<R, G>>>,
    Path(path): Path<SessionPath>,
) -> Response
where
    R: ScoringRepository + 'static,
    G: AssistedGrader + 'static,
{
    match service.report(&path.key()) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}
