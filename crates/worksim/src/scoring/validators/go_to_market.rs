use super::super::domain::{TaskSubmission, ValidationResult};
use super::super::extract::{keyword_coverage, length_score, list_score};
use super::super::rubric::{FeedbackThresholds, GoToMarketRubric};
use super::{compose, Criterion, MAX_POINTS};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoToMarketInput {
    pub channels: Vec<String>,
    pub key_message: Option<String>,
    pub launch_plan: Option<String>,
}

impl GoToMarketInput {
    pub fn from_submission(submission: &TaskSubmission) -> Self {
        Self {
            channels: submission.list("channels"),
            key_message: submission.text("key_message"),
            launch_plan: submission.text("launch_plan"),
        }
    }
}

pub fn validate(
    input: &GoToMarketInput,
    rubric: &GoToMarketRubric,
    feedback: &FeedbackThresholds,
) -> ValidationResult {
    let weights = &rubric.weights;
    let plan = input.launch_plan.as_deref();
    let mut warnings = Vec::new();

    let message_points = match input.key_message.as_deref() {
        None => 0.0,
        Some(message) => {
            let len = message.chars().count();
            if len < rubric.message_min_chars {
                rubric.short_message_points
            } else if len > rubric.message_max_chars {
                warnings.push(format!(
                    "Key message runs {len} characters; aim for {} or fewer",
                    rubric.message_max_chars
                ));
                rubric.long_message_points
            } else {
                MAX_POINTS
            }
        }
    };

    let criteria = [
        Criterion::ratio(
            "channel_mix",
            weights.channel_mix,
            list_score(&input.channels, rubric.min_channels),
        )
        .feedback(
            "Balanced channel mix",
            "Combine at least three channels so launch reach does not hinge on one",
        ),
        Criterion::points("message_clarity", weights.message_clarity, message_points).feedback(
            "Key message is crisp and memorable",
            "Write a single key message of one or two sentences",
        ),
        Criterion::ratio(
            "plan_coverage",
            weights.plan_coverage,
            keyword_coverage(plan, &rubric.keywords),
        )
        .feedback(
            "Launch plan covers timeline, partners and channels",
            "Cover the launch timeline, partnerships and channel activities in the plan",
        ),
        Criterion::ratio(
            "plan_depth",
            weights.plan_depth,
            length_score(plan, rubric.plan_target_chars),
        )
        .feedback(
            "Launch plan is detailed",
            "Add concrete activities and owners to the launch plan",
        ),
    ];

    compose(&criteria, warnings, feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overly_long_message_is_penalised() {
        let input = GoToMarketInput {
            key_message: Some("a".repeat(200)),
            ..GoToMarketInput::default()
        };
        let result = validate(
            &input,
            &GoToMarketRubric::default(),
            &FeedbackThresholds::default(),
        );
        assert_eq!(result.breakdown.get("message_clarity"), Some(&3.0));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn plan_keywords_drive_coverage() {
        let input = GoToMarketInput {
            channels: vec!["Social".into(), "Email".into(), "Retail".into()],
            key_message: Some("A week of battery, a lifetime of runs.".to_string()),
            launch_plan: Some(
                "Six-week timeline: teaser social posts and an influencer seeding wave, \
                 email waitlist nurture, a retail partnership with running stores, and a \
                 launch-day livestream."
                    .to_string(),
            ),
        };
        let result = validate(
            &input,
            &GoToMarketRubric::default(),
            &FeedbackThresholds::default(),
        );
        assert_eq!(result.breakdown.get("plan_coverage"), Some(&5.0));
        assert_eq!(result.breakdown.get("channel_mix"), Some(&5.0));
        assert!(result.score >= 85, "score was {}", result.score);
    }
}
