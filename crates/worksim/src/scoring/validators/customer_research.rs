use super::super::domain::{TaskSubmission, ValidationResult};
use super::super::extract::{keyword_coverage, length_score, list_score, meets_min_length};
use super::super::rubric::{CustomerResearchRubric, FeedbackThresholds};
use super::{compose, Criterion};

/// Normalised customer research answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerResearchInput {
    pub problem_statement: Option<String>,
    pub target_persona: Option<String>,
    pub pain_points: Vec<String>,
}

impl CustomerResearchInput {
    pub fn from_submission(submission: &TaskSubmission) -> Self {
        Self {
            problem_statement: submission.text("problem_statement"),
            target_persona: submission.text("target_persona"),
            pain_points: submission.list("pain_points"),
        }
    }
}

pub fn validate(
    input: &CustomerResearchInput,
    rubric: &CustomerResearchRubric,
    feedback: &FeedbackThresholds,
) -> ValidationResult {
    let weights = &rubric.weights;
    let problem = input.problem_statement.as_deref();

    // Pain points count toward keyword coverage as much as the prose does.
    let evidence = std::iter::once(problem.unwrap_or_default())
        .chain(input.pain_points.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");

    let persona = match input.target_persona.as_deref() {
        None => 0.0,
        Some(persona) if meets_min_length(Some(persona), rubric.persona_min_chars) => 1.0,
        Some(_) => rubric.short_persona_credit,
    };

    let criteria = [
        Criterion::ratio(
            "problem_clarity",
            weights.problem_clarity,
            length_score(problem, rubric.problem_target_chars),
        )
        .feedback(
            "Clear, well-developed problem statement",
            "Expand the problem statement with who is affected and how",
        ),
        Criterion::ratio(
            "pain_point_coverage",
            weights.pain_point_coverage,
            keyword_coverage(Some(evidence.as_str()), &rubric.keywords),
        )
        .feedback(
            "Covers the main customer pain themes",
            "Reference more of the pain themes surfaced in the interviews",
        ),
        Criterion::ratio(
            "pain_point_count",
            weights.pain_point_count,
            list_score(&input.pain_points, rubric.min_pain_points),
        )
        .feedback(
            "Identified a solid set of distinct pain points",
            "List at least three distinct customer pain points",
        ),
        Criterion::ratio("persona_definition", weights.persona_definition, persona).feedback(
            "Target persona is specific and actionable",
            "Describe the target persona in more detail",
        ),
    ];

    compose(&criteria, Vec::new(), feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_input() -> CustomerResearchInput {
        CustomerResearchInput {
            problem_statement: Some(
                "Active commuters abandon their smartwatches within three months because battery \
                 life collapses once GPS is on, the price feels unjustified against phones, and the \
                 band causes discomfort during long runs. Health tracking is the main reason they \
                 buy, yet the design makes daily charging a chore."
                    .to_string(),
            ),
            target_persona: Some(
                "Maya, 32, urban runner who trains five days a week and tracks heart rate zones"
                    .to_string(),
            ),
            pain_points: vec![
                "Battery dies mid-run".to_string(),
                "Price premium over fitness bands".to_string(),
                "Strap comfort and durability".to_string(),
            ],
        }
    }

    #[test]
    fn strong_answer_scores_high() {
        let result = validate(
            &strong_input(),
            &CustomerResearchRubric::default(),
            &FeedbackThresholds::default(),
        );
        assert!(result.score >= 90, "score was {}", result.score);
        assert!(result
            .strengths
            .iter()
            .any(|strength| strength.contains("pain points")));
    }

    #[test]
    fn short_persona_earns_partial_credit() {
        let mut input = strong_input();
        input.target_persona = Some("Runners".to_string());
        let result = validate(
            &input,
            &CustomerResearchRubric::default(),
            &FeedbackThresholds::default(),
        );
        assert_eq!(result.breakdown.get("persona_definition"), Some(&2.5));
    }

    #[test]
    fn short_persona_credit_is_configurable() {
        let mut input = strong_input();
        input.target_persona = Some("Runners".to_string());
        let rubric = CustomerResearchRubric {
            short_persona_credit: 0.2,
            ..CustomerResearchRubric::default()
        };
        let result = validate(&input, &rubric, &FeedbackThresholds::default());
        assert_eq!(result.breakdown.get("persona_definition"), Some(&1.0));
    }

    #[test]
    fn empty_input_scores_zero_with_guidance() {
        let input = CustomerResearchInput::from_submission(&TaskSubmission::new("task1"));
        let result = validate(
            &input,
            &CustomerResearchRubric::default(),
            &FeedbackThresholds::default(),
        );
        assert_eq!(result.score, 0);
        assert_eq!(result.strengths, vec!["Completed the task".to_string()]);
        assert_eq!(result.improvements.len(), 3);
    }
}
