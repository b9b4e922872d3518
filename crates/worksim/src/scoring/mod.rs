//! Rubric-based scoring for workplace simulation tasks.
//!
//! Submissions flow through a single normalisation step into typed inputs, are scored by
//! the validator resolved from the task catalog, and are aggregated into weighted final and
//! per-skill scores. Scoring itself is synchronous and never fails; only storage and invalid
//! decision-loop moves surface errors through the service.

pub mod aggregate;
pub mod decision;
pub mod dispatch;
pub mod domain;
pub mod extract;
pub mod grader;
pub mod progress;
pub mod repository;
pub mod router;
pub mod rubric;
pub mod service;
pub(crate) mod validators;

#[cfg(test)]
mod tests;

pub use aggregate::{final_score, skill_breakdown, FinalReport, TaskScores};
pub use decision::{
    DecisionError, DecisionLoopConfig, DecisionLoopState, DecisionOption, DecisionRecord,
    DecisionStep,
};
pub use dispatch::{score_submission, Dispatch, Scored, ValidatorKind};
pub use domain::{
    ScoreSource, SessionKey, SubmissionRecord, TaskId, TaskSubmission, ValidationResult,
};
pub use grader::{AssistedGrader, GraderError, NoGrader};
pub use progress::ProgressRecord;
pub use repository::{RepositoryError, ScoringRepository, SubmissionView};
pub use router::scoring_router;
pub use rubric::{FeedbackThresholds, RubricConfig, RubricError, TaskDefinition};
pub use service::{
    DecisionOutcome, ScoringServiceError, SimulationScoringService, SubmissionOutcome,
};
