//! Per-task validators. Each one normalises the raw submission into a typed
//! input, derives a handful of weighted criteria on a 0–5 scale, and hands them
//! to [`compose`] which turns them into the 0–100 result with feedback.

pub mod competitive_analysis;
pub mod customer_research;
pub mod fallback;
pub mod feature_prioritization;
pub mod go_to_market;
pub mod launch_metrics;
pub mod pricing_strategy;

use std::collections::BTreeMap;

use super::domain::ValidationResult;
use super::rubric::FeedbackThresholds;

/// Upper bound of a criterion value.
pub const MAX_POINTS: f32 = 5.0;

/// Scale factor from the weighted 0–5 total to a 0–100 score.
const SCORE_SCALE: f32 = 20.0;

/// A weighted sub-score with the feedback it triggers at either end.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Criterion {
    pub key: &'static str,
    pub weight: f32,
    pub value: f32,
    pub strength: &'static str,
    pub improvement: &'static str,
}

impl Criterion {
    /// Criterion from a `[0, 1]` ratio.
    pub fn ratio(key: &'static str, weight: f32, ratio: f32) -> Self {
        Self::points(key, weight, ratio * MAX_POINTS)
    }

    pub fn points(key: &'static str, weight: f32, value: f32) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, MAX_POINTS)
        } else {
            0.0
        };
        Self {
            key,
            weight,
            value,
            strength: "",
            improvement: "",
        }
    }

    pub fn feedback(mut self, strength: &'static str, improvement: &'static str) -> Self {
        self.strength = strength;
        self.improvement = improvement;
        self
    }
}

/// Weighted sum × 20, rounded and clamped, plus threshold-driven feedback.
pub(crate) fn compose(
    criteria: &[Criterion],
    warnings: Vec<String>,
    feedback: &FeedbackThresholds,
) -> ValidationResult {
    let weighted: f32 = criteria
        .iter()
        .map(|criterion| criterion.weight * criterion.value)
        .sum();
    let score = (weighted * SCORE_SCALE).round().clamp(0.0, 100.0) as u8;

    let breakdown: BTreeMap<String, f32> = criteria
        .iter()
        .map(|criterion| {
            (
                criterion.key.to_string(),
                (criterion.value * 100.0).round() / 100.0,
            )
        })
        .collect();

    let strength_floor = feedback.strength_ratio * MAX_POINTS;
    let improvement_ceiling = feedback.improvement_ratio * MAX_POINTS;

    let mut strengths: Vec<String> = criteria
        .iter()
        .filter(|criterion| criterion.value >= strength_floor && !criterion.strength.is_empty())
        .take(feedback.max_items)
        .map(|criterion| criterion.strength.to_string())
        .collect();
    let mut improvements: Vec<String> = criteria
        .iter()
        .filter(|criterion| {
            criterion.value < improvement_ceiling && !criterion.improvement.is_empty()
        })
        .take(feedback.max_items)
        .map(|criterion| criterion.improvement.to_string())
        .collect();

    if strengths.is_empty() {
        strengths.push(feedback.fallback_strength.clone());
    }
    if improvements.is_empty() {
        improvements.push(feedback.fallback_improvement.clone());
    }

    ValidationResult {
        score,
        breakdown,
        strengths,
        improvements,
        warnings,
    }
}
