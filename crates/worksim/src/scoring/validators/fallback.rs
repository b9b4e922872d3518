//! Scoring for tasks whose validator cannot be resolved.

use std::collections::BTreeMap;

use super::super::domain::{TaskSubmission, ValidationResult};
use super::super::rubric::{FallbackRubric, FeedbackThresholds};
use super::{compose, Criterion};

/// Completeness (answered fields) and volume of text, weighted by the fallback rubric.
pub fn length_based(
    submission: &TaskSubmission,
    rubric: &FallbackRubric,
    feedback: &FeedbackThresholds,
) -> ValidationResult {
    let answered_fields = submission
        .fields
        .keys()
        .filter(|key| submission.text(key).is_some())
        .count();
    let answered_lists = submission
        .selections
        .keys()
        .filter(|key| !submission.list(key).is_empty())
        .count();
    let asked = submission.fields.len() + submission.selections.len();
    let completeness = if asked == 0 {
        0.0
    } else {
        (answered_fields + answered_lists) as f32 / asked as f32
    };
    let text_len = submission.total_text_len();
    let detail = match rubric.detail_target_chars {
        0 if text_len > 0 => 1.0,
        0 => 0.0,
        target => (text_len as f32 / target as f32).clamp(0.0, 1.0),
    };

    let criteria = [
        Criterion::ratio("completeness", rubric.weights.completeness, completeness).feedback(
            "Answered every part of the task",
            "Fill in every field before submitting",
        ),
        Criterion::ratio("detail", rubric.weights.detail, detail).feedback(
            "Responses are detailed",
            "Add more detail to your responses",
        ),
    ];

    compose(
        &criteria,
        vec![format!(
            "No dedicated rubric for task {}; scored on completeness and length",
            submission.task_id
        )],
        feedback,
    )
}

/// Fixed result for submissions that give the fallback nothing to measure.
pub fn default_result(submission: &TaskSubmission, feedback: &FeedbackThresholds) -> ValidationResult {
    ValidationResult {
        score: feedback.default_score.min(100),
        breakdown: BTreeMap::new(),
        strengths: vec![feedback.fallback_strength.clone()],
        improvements: vec![feedback.default_improvement.clone()],
        warnings: vec![format!(
            "No rubric available for task {}; default score applied",
            submission.task_id
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rubric::FallbackWeights;

    #[test]
    fn length_based_rewards_complete_detailed_answers() {
        let submission = TaskSubmission::new("bonus")
            .with_field("summary", "x".repeat(300))
            .with_selection("tags", ["a"]);
        let result = length_based(
            &submission,
            &FallbackRubric::default(),
            &FeedbackThresholds::default(),
        );
        assert_eq!(result.score, 100);
        assert!(result.warnings[0].contains("bonus"));
    }

    #[test]
    fn half_answered_submission_scores_partially() {
        let submission = TaskSubmission::new("bonus")
            .with_field("summary", "x".repeat(150))
            .with_field("notes", "  ");
        let result = length_based(
            &submission,
            &FallbackRubric::default(),
            &FeedbackThresholds::default(),
        );
        assert_eq!(result.breakdown.get("completeness"), Some(&2.5));
        assert_eq!(result.score, 50);
    }

    #[test]
    fn fallback_weights_come_from_the_rubric() {
        let rubric = FallbackRubric {
            weights: FallbackWeights {
                completeness: 1.0,
                detail: 0.0,
            },
            detail_target_chars: 300,
        };
        let submission = TaskSubmission::new("bonus").with_field("summary", "short");
        let result = length_based(&submission, &rubric, &FeedbackThresholds::default());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn default_result_uses_configured_score() {
        let result = default_result(&TaskSubmission::new("bonus"), &FeedbackThresholds::default());
        assert_eq!(result.score, 50);
        assert_eq!(
            result.improvements,
            vec!["Review the task instructions and resubmit".to_string()]
        );
    }
}
