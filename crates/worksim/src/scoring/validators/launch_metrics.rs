use super::super::domain::{TaskSubmission, ValidationResult};
use super::super::extract::{keyword_coverage, length_score, list_score, meets_min_length};
use super::super::rubric::{FeedbackThresholds, LaunchMetricsRubric};
use super::{compose, Criterion};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchMetricsInput {
    pub kpis: Vec<String>,
    pub insight: Option<String>,
    pub recommendation: Option<String>,
}

impl LaunchMetricsInput {
    pub fn from_submission(submission: &TaskSubmission) -> Self {
        Self {
            kpis: submission.list("kpis"),
            insight: submission.text("insight"),
            recommendation: submission.text("recommendation"),
        }
    }
}

pub fn validate(
    input: &LaunchMetricsInput,
    rubric: &LaunchMetricsRubric,
    feedback: &FeedbackThresholds,
) -> ValidationResult {
    let weights = &rubric.weights;
    let insight = input.insight.as_deref();

    let recommendation = match input.recommendation.as_deref() {
        None => 0.0,
        Some(text) if meets_min_length(Some(text), rubric.recommendation_min_chars) => 1.0,
        Some(_) => rubric.short_recommendation_credit,
    };

    let criteria = [
        Criterion::ratio(
            "kpi_selection",
            weights.kpi_selection,
            list_score(&input.kpis, rubric.min_kpis),
        )
        .feedback(
            "Tracked a meaningful set of KPIs",
            "Select at least three KPIs that reflect launch health",
        ),
        Criterion::ratio(
            "insight_quality",
            weights.insight_quality,
            keyword_coverage(insight, &rubric.keywords),
        )
        .feedback(
            "Insight connects retention, conversion and revenue signals",
            "Ground the insight in retention, churn and conversion data",
        ),
        Criterion::ratio(
            "insight_depth",
            weights.insight_depth,
            length_score(insight, rubric.insight_target_chars),
        )
        .feedback(
            "Insight is explained in depth",
            "Explain what is driving the numbers, not just what they are",
        ),
        Criterion::ratio("recommendation", weights.recommendation, recommendation).feedback(
            "Recommendation is specific and actionable",
            "Close with a concrete, data-backed recommendation",
        ),
    ];

    compose(&criteria, Vec::new(), feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terse_recommendation_earns_partial_credit() {
        let input = LaunchMetricsInput {
            recommendation: Some("Cut price".to_string()),
            ..LaunchMetricsInput::default()
        };
        let result = validate(
            &input,
            &LaunchMetricsRubric::default(),
            &FeedbackThresholds::default(),
        );
        assert_eq!(result.breakdown.get("recommendation"), Some(&2.0));
        assert_eq!(result.score, 8);
    }

    #[test]
    fn data_driven_review_scores_well() {
        let input = LaunchMetricsInput {
            kpis: vec!["30-day retention".into(), "Churn".into(), "NPS".into()],
            insight: Some(
                "Retention drops to 61% by day 30 while churn spikes among users who never \
                 enable sleep tracking; conversion from trial is healthy, engagement with \
                 coaching is low, revenue per user is on plan and NPS sits at 34."
                    .to_string(),
            ),
            recommendation: Some(
                "Prompt sleep tracking during onboarding and A/B test a coaching nudge in week two."
                    .to_string(),
            ),
        };
        let result = validate(
            &input,
            &LaunchMetricsRubric::default(),
            &FeedbackThresholds::default(),
        );
        assert_eq!(result.breakdown.get("insight_quality"), Some(&5.0));
        assert!(result.score >= 95, "score was {}", result.score);
    }
}
