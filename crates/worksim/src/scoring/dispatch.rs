use serde::{Deserialize, Serialize};

use super::decision;
use super::domain::{ScoreSource, TaskSubmission, ValidationResult};
use super::rubric::RubricConfig;
use super::validators::competitive_analysis::{self, CompetitiveAnalysisInput};
use super::validators::customer_research::{self, CustomerResearchInput};
use super::validators::feature_prioritization::{self, FeaturePrioritizationInput};
use super::validators::go_to_market::{self, GoToMarketInput};
use super::validators::launch_metrics::{self, LaunchMetricsInput};
use super::validators::pricing_strategy::{self, PricingStrategyInput};
use super::validators::fallback;

/// Closed set of task types with a dedicated validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    CustomerResearch,
    CompetitiveAnalysis,
    FeaturePrioritization,
    GoToMarket,
    PricingStrategy,
    LaunchMetrics,
    StakeholderPersona,
}

impl ValidatorKind {
    pub const fn all() -> [Self; 7] {
        [
            Self::CustomerResearch,
            Self::CompetitiveAnalysis,
            Self::FeaturePrioritization,
            Self::GoToMarket,
            Self::PricingStrategy,
            Self::LaunchMetrics,
            Self::StakeholderPersona,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::CustomerResearch => "customer_research",
            Self::CompetitiveAnalysis => "competitive_analysis",
            Self::FeaturePrioritization => "feature_prioritization",
            Self::GoToMarket => "go_to_market",
            Self::PricingStrategy => "pricing_strategy",
            Self::LaunchMetrics => "launch_metrics",
            Self::StakeholderPersona => "stakeholder_persona",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::all()
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn validate(self, submission: &TaskSubmission, rubric: &RubricConfig) -> ValidationResult {
        let criteria = &rubric.criteria;
        let feedback = &rubric.feedback;
        match self {
            Self::CustomerResearch => customer_research::validate(
                &CustomerResearchInput::from_submission(submission),
                &criteria.customer_research,
                feedback,
            ),
            Self::CompetitiveAnalysis => competitive_analysis::validate(
                &CompetitiveAnalysisInput::from_submission(submission),
                &criteria.competitive_analysis,
                feedback,
            ),
            Self::FeaturePrioritization => feature_prioritization::validate(
                &FeaturePrioritizationInput::from_submission(submission),
                &criteria.feature_prioritization,
                feedback,
            ),
            Self::GoToMarket => go_to_market::validate(
                &GoToMarketInput::from_submission(submission),
                &criteria.go_to_market,
                feedback,
            ),
            Self::PricingStrategy => pricing_strategy::validate(
                &PricingStrategyInput::from_submission(submission),
                &criteria.pricing_strategy,
                feedback,
            ),
            Self::LaunchMetrics => launch_metrics::validate(
                &LaunchMetricsInput::from_submission(submission),
                &criteria.launch_metrics,
                feedback,
            ),
            Self::StakeholderPersona => {
                let (state, warnings) =
                    decision::replay(&submission.list("choices"), &rubric.decision_loop);
                decision::evaluate_state(&state, &rubric.decision_loop, feedback, warnings)
            }
        }
    }
}

/// Outcome of resolving a task id against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Known(ValidatorKind),
    Fallback,
}

impl Dispatch {
    pub fn resolve(submission: &TaskSubmission, rubric: &RubricConfig) -> Self {
        rubric
            .task(&submission.task_id)
            .and_then(|task| ValidatorKind::from_name(&task.validator))
            .map(Self::Known)
            .unwrap_or(Self::Fallback)
    }
}

/// Rule-based result plus the path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub result: ValidationResult,
    pub source: ScoreSource,
}

/// Scores any submission. Never fails: unknown task types fall back to a
/// length-based scorer, or to the configured default when there is no text.
pub fn score_submission(submission: &TaskSubmission, rubric: &RubricConfig) -> Scored {
    match Dispatch::resolve(submission, rubric) {
        Dispatch::Known(kind) => Scored {
            result: kind.validate(submission, rubric),
            source: ScoreSource::RuleBased,
        },
        Dispatch::Fallback if submission.has_text() => Scored {
            result: fallback::length_based(submission, &rubric.criteria.fallback, &rubric.feedback),
            source: ScoreSource::Fallback,
        },
        Dispatch::Fallback => Scored {
            result: fallback::default_result(submission, &rubric.feedback),
            source: ScoreSource::Fallback,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_name() {
        for kind in ValidatorKind::all() {
            assert_eq!(ValidatorKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(
            ValidatorKind::from_name(" Go_To_Market "),
            Some(ValidatorKind::GoToMarket)
        );
        assert_eq!(ValidatorKind::from_name("validateTask9"), None);
    }

    #[test]
    fn standard_catalog_resolves_every_task() {
        let rubric = RubricConfig::standard();
        for task in &rubric.tasks {
            let submission = TaskSubmission::new(task.id.as_str());
            assert!(matches!(
                Dispatch::resolve(&submission, &rubric),
                Dispatch::Known(_)
            ));
        }
    }

    #[test]
    fn misconfigured_validator_name_falls_back() {
        let mut rubric = RubricConfig::standard();
        rubric.tasks[0].validator = "validateTask1Legacy".to_string();

        let empty = score_submission(&TaskSubmission::new("task1"), &rubric);
        assert_eq!(empty.source, ScoreSource::Fallback);
        assert_eq!(empty.result.score, 50);

        let answered = score_submission(
            &TaskSubmission::new("task1").with_field("problem_statement", "x".repeat(300)),
            &rubric,
        );
        assert_eq!(answered.source, ScoreSource::Fallback);
        assert_eq!(answered.result.score, 100);
    }
}
