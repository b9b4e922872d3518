use serde::Serialize;

use super::decision::DecisionLoopState;
use super::domain::{ScoreSource, SessionKey, SubmissionRecord, TaskId};
use super::progress::ProgressRecord;

/// Storage abstraction so the service module can be exercised in isolation.
/// Submissions are keyed by session and task; a later save replaces the earlier one.
pub trait ScoringRepository: Send + Sync {
    fn save_submission(
        &self,
        session: &SessionKey,
        record: SubmissionRecord,
    ) -> Result<(), RepositoryError>;
    fn submission(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError>;
    fn submissions(&self, session: &SessionKey) -> Result<Vec<SubmissionRecord>, RepositoryError>;

    fn fetch_progress(&self, session: &SessionKey)
        -> Result<Option<ProgressRecord>, RepositoryError>;
    fn save_progress(
        &self,
        session: &SessionKey,
        progress: ProgressRecord,
    ) -> Result<(), RepositoryError>;

    fn fetch_decision_state(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
    ) -> Result<Option<DecisionLoopState>, RepositoryError>;
    fn save_decision_state(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
        state: DecisionLoopState,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Compact view of a stored submission for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    pub task_id: TaskId,
    pub score: u8,
    pub source: &'static str,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl SubmissionRecord {
    pub fn view(&self) -> SubmissionView {
        SubmissionView {
            task_id: self.submission.task_id.clone(),
            score: self.result.score,
            source: self.source.label(),
            strengths: self.result.strengths.clone(),
            improvements: self.result.improvements.clone(),
            warnings: self.result.warnings.clone(),
        }
    }

    pub fn is_assisted(&self) -> bool {
        self.source == ScoreSource::Assisted
    }
}
