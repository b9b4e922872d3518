use super::super::domain::{TaskSubmission, ValidationResult};
use super::super::extract::{keyword_coverage, length_score, list_score};
use super::super::rubric::{FeaturePrioritizationRubric, FeedbackThresholds};
use super::{compose, Criterion, MAX_POINTS};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturePrioritizationInput {
    pub framework: Option<String>,
    pub must_have: Vec<String>,
    pub rationale: Option<String>,
}

impl FeaturePrioritizationInput {
    pub fn from_submission(submission: &TaskSubmission) -> Self {
        Self {
            framework: submission.choice("framework"),
            must_have: submission.list("must_have"),
            rationale: submission.text("rationale"),
        }
    }
}

pub fn validate(
    input: &FeaturePrioritizationInput,
    rubric: &FeaturePrioritizationRubric,
    feedback: &FeedbackThresholds,
) -> ValidationResult {
    let weights = &rubric.weights;
    let rationale = input.rationale.as_deref();
    let mut warnings = Vec::new();

    let framework_points = match input.framework.as_deref() {
        None => 0.0,
        Some(framework)
            if rubric
                .known_frameworks
                .iter()
                .any(|known| known.eq_ignore_ascii_case(framework)) =>
        {
            MAX_POINTS
        }
        Some(framework) => {
            warnings.push(format!("Unrecognised prioritisation framework '{framework}'"));
            rubric.unknown_framework_points
        }
    };

    let count = input.must_have.len();
    let scope_points = if count > rubric.max_must_have {
        warnings.push(format!(
            "{count} must-have features dilutes focus; keep it to {} or fewer",
            rubric.max_must_have
        ));
        rubric.overscoped_points
    } else {
        list_score(&input.must_have, rubric.min_must_have) * MAX_POINTS
    };

    let criteria = [
        Criterion::points("framework_choice", weights.framework_choice, framework_points).feedback(
            "Applied a recognised prioritisation framework",
            "Pick a prioritisation framework such as RICE or MoSCoW",
        ),
        Criterion::points("scope_discipline", weights.scope_discipline, scope_points).feedback(
            "Kept the must-have list focused",
            "Commit to three to five must-have features",
        ),
        Criterion::ratio(
            "rationale_quality",
            weights.rationale_quality,
            keyword_coverage(rationale, &rubric.keywords),
        )
        .feedback(
            "Rationale weighs customer impact against effort and risk",
            "Justify priorities with customer impact, effort, data and risk",
        ),
        Criterion::ratio(
            "rationale_depth",
            weights.rationale_depth,
            length_score(rationale, rubric.rationale_target_chars),
        )
        .feedback(
            "Rationale is thorough",
            "Explain the trade-offs behind each must-have in more depth",
        ),
    ];

    compose(&criteria, warnings, feedback)
}
