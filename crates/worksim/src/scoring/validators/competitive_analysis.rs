use super::super::domain::{TaskSubmission, ValidationResult};
use super::super::extract::{keyword_coverage, length_score, list_score, word_coverage};
use super::super::rubric::{CompetitiveAnalysisRubric, FeedbackThresholds};
use super::{compose, Criterion};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompetitiveAnalysisInput {
    pub competitors: Vec<String>,
    pub differentiation: Option<String>,
    pub positioning_statement: Option<String>,
}

impl CompetitiveAnalysisInput {
    pub fn from_submission(submission: &TaskSubmission) -> Self {
        let mut competitors = submission.list("competitors");
        // Case-only duplicates are the same competitor.
        let mut seen = std::collections::BTreeSet::new();
        competitors.retain(|name| seen.insert(name.to_lowercase()));

        Self {
            competitors,
            differentiation: submission.text("differentiation"),
            positioning_statement: submission.text("positioning_statement"),
        }
    }
}

pub fn validate(
    input: &CompetitiveAnalysisInput,
    rubric: &CompetitiveAnalysisRubric,
    feedback: &FeedbackThresholds,
) -> ValidationResult {
    let weights = &rubric.weights;
    let differentiation = input.differentiation.as_deref();
    let positioning = input.positioning_statement.as_deref();

    let mut warnings = Vec::new();
    if positioning.is_some() && differentiation.is_none() {
        warnings.push("Positioning statement submitted without supporting differentiation".to_string());
    }

    let criteria = [
        Criterion::ratio(
            "competitor_breadth",
            weights.competitor_breadth,
            list_score(&input.competitors, rubric.min_competitors),
        )
        .feedback(
            "Mapped a broad set of competitors",
            "Compare against at least three direct competitors",
        ),
        Criterion::ratio(
            "differentiation_focus",
            weights.differentiation_focus,
            keyword_coverage(differentiation, &rubric.keywords),
        )
        .feedback(
            "Differentiators address the dimensions buyers compare on",
            "Tie differentiation to battery, price, ecosystem and design trade-offs",
        ),
        Criterion::ratio(
            "positioning_structure",
            weights.positioning_structure,
            word_coverage(positioning, &rubric.positioning_markers),
        )
        .feedback(
            "Positioning statement follows the target/need/benefit structure",
            "Use the 'For <target> who <need>, <product> is <category> that <benefit>' form",
        ),
        Criterion::ratio(
            "analysis_depth",
            weights.analysis_depth,
            length_score(differentiation, rubric.depth_target_chars),
        )
        .feedback(
            "Analysis goes beyond surface-level comparison",
            "Add detail explaining why each differentiator matters",
        ),
    ];

    compose(&criteria, warnings, feedback)
}
