use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::aggregate::{FinalReport, TaskScores};
use super::decision::{DecisionError, DecisionLoopState, DecisionRecord};
use super::dispatch::{score_submission, Dispatch, Scored, ValidatorKind};
use super::domain::{ScoreSource, SessionKey, SubmissionRecord, TaskId, TaskSubmission};
use super::grader::{AssistedGrader, NoGrader};
use super::progress::ProgressRecord;
use super::repository::{RepositoryError, ScoringRepository};
use super::rubric::RubricConfig;

/// Service composing the rubric, the rule engine, an optional assisted grader and storage.
pub struct SimulationScoringService<R, G> {
    repository: Arc<R>,
    grader: Option<Arc<G>>,
    rubric: Arc<RubricConfig>,
}

impl<R> SimulationScoringService<R, NoGrader>
where
    R: ScoringRepository + 'static,
{
    pub fn new(repository: Arc<R>, rubric: RubricConfig) -> Self {
        Self {
            repository,
            grader: None,
            rubric: Arc::new(rubric),
        }
    }
}

/// Stored submission plus the progress it produced.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub record: SubmissionRecord,
    pub progress: ProgressRecord,
}

/// Result of one decision-loop move.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionOutcome {
    pub decision: DecisionRecord,
    pub state: DecisionLoopState,
    pub complete: bool,
    /// Present once the last step is answered and the task has been scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmissionOutcome>,
}

impl<R, G> SimulationScoringService<R, G>
where
    R: ScoringRepository + 'static,
    G: AssistedGrader + 'static,
{
    pub fn with_grader(repository: Arc<R>, grader: Arc<G>, rubric: RubricConfig) -> Self {
        Self {
            repository,
            grader: Some(grader),
            rubric: Arc::new(rubric),
        }
    }

    pub fn rubric(&self) -> &RubricConfig {
        &self.rubric
    }

    /// Scores a submission without touching storage. Tries the assisted grader for
    /// free-text tasks and falls back to the rule engine on any grader error.
    pub fn score(&self, submission: &TaskSubmission) -> Scored {
        let dispatch = Dispatch::resolve(submission, &self.rubric);
        let assisted = match (dispatch, &self.grader) {
            (Dispatch::Known(kind), Some(grader)) if kind != ValidatorKind::StakeholderPersona => {
                self.rubric
                    .task(&submission.task_id)
                    .and_then(|task| match grader.grade(task, submission) {
                        Ok(result) => Some(result.clamped()),
                        Err(err) => {
                            warn!(
                                task_id = %submission.task_id,
                                error = %err,
                                "assisted grading failed; using rule-based score"
                            );
                            None
                        }
                    })
            }
            _ => None,
        };

        if let Some(result) = assisted {
            return Scored {
                result,
                source: ScoreSource::Assisted,
            };
        }

        let scored = score_submission(submission, &self.rubric);
        if scored.source == ScoreSource::Fallback {
            warn!(
                task_id = %submission.task_id,
                score = scored.result.score,
                "no validator resolved for task; applied fallback scoring"
            );
        }
        scored
    }

    /// Scores and stores a submission, then refreshes session progress.
    pub fn submit(
        &self,
        session: &SessionKey,
        submission: TaskSubmission,
    ) -> Result<SubmissionOutcome, ScoringServiceError> {
        let Scored { result, source } = self.score(&submission);
        let task_id = submission.task_id.clone();
        let record = SubmissionRecord {
            submission,
            result,
            source,
            submitted_at: Utc::now(),
        };
        self.repository.save_submission(session, record.clone())?;

        let mut progress = self
            .repository
            .fetch_progress(session)?
            .unwrap_or_else(|| ProgressRecord::start(record.submitted_at));
        let was_final = progress.is_finalized();

        // Rebuilt from stored submissions, read after the progress record.
        let results = self.task_scores(session)?;
        progress.record_results(&results, &self.rubric.tasks);
        if progress.finalize(&results, &self.rubric) && !was_final {
            info!(
                user_id = %session.user_id,
                simulation_id = %session.simulation_id,
                final_score = progress.final_score.unwrap_or_default(),
                "simulation completed"
            );
        }
        self.repository.save_progress(session, progress.clone())?;

        info!(
            user_id = %session.user_id,
            task_id = %task_id,
            score = record.result.score,
            source = record.source.label(),
            percentage = progress.percentage,
            "task submission scored"
        );

        Ok(SubmissionOutcome { record, progress })
    }

    /// Stored progress, reconciled with the stored submissions.
    pub fn progress(&self, session: &SessionKey) -> Result<ProgressRecord, ScoringServiceError> {
        let mut progress = self
            .repository
            .fetch_progress(session)?
            .ok_or(RepositoryError::NotFound)?;
        let results = self.task_scores(session)?;
        if !results.keys().all(|id| progress.completed_task_ids.contains(id)) {
            progress.record_results(&results, &self.rubric.tasks);
            progress.finalize(&results, &self.rubric);
        }
        Ok(progress)
    }

    /// Latest stored result for one task.
    pub fn result(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
    ) -> Result<SubmissionRecord, ScoringServiceError> {
        let record = self
            .repository
            .submission(session, task_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Current decision-loop state, or a fresh one at the starting budget.
    pub fn decision_state(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
    ) -> Result<DecisionLoopState, ScoringServiceError> {
        self.ensure_decision_task(task_id)?;
        let state = self
            .repository
            .fetch_decision_state(session, task_id)?
            .unwrap_or_else(|| self.rubric.decision_loop.start());
        Ok(state)
    }

    /// Applies one choice. Completing the last step submits the task for scoring.
    pub fn decide(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
        option_id: &str,
    ) -> Result<DecisionOutcome, ScoringServiceError> {
        let mut state = self.decision_state(session, task_id)?;
        let config = &self.rubric.decision_loop;
        let decision = state.apply(option_id, config)?;
        self.repository
            .save_decision_state(session, task_id, state.clone())?;

        let complete = state.is_complete(config);
        let submission = if complete {
            let choices = state.choices.iter().map(|choice| choice.option_id.clone());
            let submission = TaskSubmission::new(task_id.as_str()).with_selection("choices", choices);
            Some(self.submit(session, submission)?)
        } else {
            None
        };

        Ok(DecisionOutcome {
            decision,
            state,
            complete,
            submission,
        })
    }

    /// Aggregated report over whatever has been submitted so far.
    pub fn report(&self, session: &SessionKey) -> Result<FinalReport, ScoringServiceError> {
        let results = self.task_scores(session)?;
        Ok(FinalReport::build(&results, &self.rubric))
    }

    fn task_scores(&self, session: &SessionKey) -> Result<TaskScores, ScoringServiceError> {
        let scores = self
            .repository
            .submissions(session)?
            .into_iter()
            .map(|record| (record.submission.task_id, record.result.score))
            .collect();
        Ok(scores)
    }

    fn ensure_decision_task(&self, task_id: &TaskId) -> Result<(), ScoringServiceError> {
        let task = self
            .rubric
            .task(task_id)
            .ok_or_else(|| ScoringServiceError::UnknownTask(task_id.clone()))?;
        match ValidatorKind::from_name(&task.validator) {
            Some(ValidatorKind::StakeholderPersona) => Ok(()),
            _ => Err(ScoringServiceError::NotDecisionTask(task_id.clone())),
        }
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Decision(#[from] DecisionError),
    #[error("task '{0}' is not part of this simulation")]
    UnknownTask(TaskId),
    #[error("task '{0}' is not a decision task")]
    NotDecisionTask(TaskId),
}

impl ScoringServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Decision(_) | Self::NotDecisionTask(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnknownTask(_) | Self::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            Self::Repository(RepositoryError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
