use super::domain::{TaskSubmission, ValidationResult};
use super::rubric::TaskDefinition;

/// Outbound hook for model-assisted grading of free-text tasks.
pub trait AssistedGrader: Send + Sync {
    fn grade(
        &self,
        task: &TaskDefinition,
        submission: &TaskSubmission,
    ) -> Result<ValidationResult, GraderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GraderError {
    #[error("assisted grader unavailable: {0}")]
    Unavailable(String),
    #[error("assisted grader returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// Placeholder for services that score with the rule engine only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGrader;

impl AssistedGrader for NoGrader {
    fn grade(
        &self,
        _task: &TaskDefinition,
        _submission: &TaskSubmission,
    ) -> Result<ValidationResult, GraderError> {
        Err(GraderError::Unavailable("no assisted grader configured".to_string()))
    }
}
