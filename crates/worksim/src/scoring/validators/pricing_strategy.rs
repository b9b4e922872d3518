use super::super::domain::{TaskSubmission, ValidationResult};
use super::super::extract::{keyword_coverage, length_score, parse_amount};
use super::super::rubric::{FeedbackThresholds, PricingStrategyRubric};
use super::{compose, Criterion, MAX_POINTS};

/// Price field after normalisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PricePoint {
    Missing,
    Unreadable,
    Amount(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingStrategyInput {
    pub pricing_model: Option<String>,
    pub price_point: PricePoint,
    pub justification: Option<String>,
}

impl PricingStrategyInput {
    pub fn from_submission(submission: &TaskSubmission) -> Self {
        let price_point = match submission.text("price_point") {
            None => PricePoint::Missing,
            Some(raw) => parse_amount(Some(raw.as_str()))
                .map(PricePoint::Amount)
                .unwrap_or(PricePoint::Unreadable),
        };

        Self {
            pricing_model: submission.choice("pricing_model"),
            price_point,
            justification: submission.text("justification"),
        }
    }
}

pub fn validate(
    input: &PricingStrategyInput,
    rubric: &PricingStrategyRubric,
    feedback: &FeedbackThresholds,
) -> ValidationResult {
    let weights = &rubric.weights;
    let justification = input.justification.as_deref();
    let mut warnings = Vec::new();

    let model_points = match input.pricing_model.as_deref() {
        None => 0.0,
        Some(model)
            if rubric
                .known_models
                .iter()
                .any(|known| known.trim().eq_ignore_ascii_case(model)) =>
        {
            MAX_POINTS
        }
        Some(model) => {
            warnings.push(format!("Unrecognised pricing model '{model}'"));
            rubric.unknown_model_points
        }
    };

    let price_points = match input.price_point {
        PricePoint::Missing => 0.0,
        PricePoint::Unreadable => {
            warnings.push("Price point could not be read as a number".to_string());
            rubric.unreadable_price_points
        }
        PricePoint::Amount(amount) if amount < rubric.min_price || amount > rubric.max_price => {
            warnings.push(format!(
                "Price point {amount:.2} is outside the plausible range {:.0}-{:.0}",
                rubric.min_price, rubric.max_price
            ));
            rubric.out_of_range_price_points
        }
        PricePoint::Amount(_) => MAX_POINTS,
    };

    let criteria = [
        Criterion::points("model_choice", weights.model_choice, model_points).feedback(
            "Chose a pricing model suited to the launch",
            "Select the pricing model you are recommending",
        ),
        Criterion::points("price_validity", weights.price_validity, price_points).feedback(
            "Price point is concrete and market-plausible",
            "State a concrete price point within the market range",
        ),
        Criterion::ratio(
            "justification_quality",
            weights.justification_quality,
            keyword_coverage(justification, &rubric.keywords),
        )
        .feedback(
            "Justification balances margin, cost and competitor pricing",
            "Justify the price with margin, cost, competitor and segment evidence",
        ),
        Criterion::ratio(
            "justification_depth",
            weights.justification_depth,
            length_score(justification, rubric.justification_target_chars),
        )
        .feedback(
            "Justification is well argued",
            "Develop the pricing justification further",
        ),
    ];

    compose(&criteria, warnings, feedback)
}
