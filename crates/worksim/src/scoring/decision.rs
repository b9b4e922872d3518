//! Budget-tracked branching task used by the persona simulation.
//!
//! Each step offers fixed options with a fixed cost and a fixed table score.
//! The remaining budget is carried forward in [`DecisionLoopState`] and
//! persisted between steps; it is never recomputed from scratch by the service.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::ValidationResult;
use super::rubric::{FeedbackThresholds, RubricError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub id: String,
    pub label: String,
    pub cost: u32,
    pub score: u8,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionStep {
    pub key: String,
    pub prompt: String,
    pub options: Vec<DecisionOption>,
}

impl DecisionStep {
    pub fn option(&self, id: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|option| option.id == id)
    }

    fn best_score(&self) -> u8 {
        self.options
            .iter()
            .map(|option| option.score)
            .max()
            .unwrap_or(0)
    }
}

/// Bonus awarded when the learner finishes with at least `minimum_remaining` budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetBonus {
    pub minimum_remaining: u32,
    pub bonus: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionLoopConfig {
    pub starting_budget: u32,
    pub steps: Vec<DecisionStep>,
    pub budget_bonuses: Vec<BudgetBonus>,
}

fn option(id: &str, label: &str, cost: u32, score: u8, feedback: &str) -> DecisionOption {
    DecisionOption {
        id: id.to_string(),
        label: label.to_string(),
        cost,
        score,
        feedback: feedback.to_string(),
    }
}

impl Default for DecisionLoopConfig {
    fn default() -> Self {
        Self {
            starting_budget: 15_000,
            steps: vec![
                DecisionStep {
                    key: "launch_channel".to_string(),
                    prompt: "The buyer asks how you will drive awareness in launch week.".to_string(),
                    options: vec![
                        option(
                            "flagship_event",
                            "Host a flagship launch event",
                            8_000,
                            12,
                            "Memorable, but the buyer worries the spend will not reach their shoppers.",
                        ),
                        option(
                            "influencer_campaign",
                            "Run a targeted influencer campaign",
                            5_000,
                            25,
                            "The buyer likes reach into the fitness segment at a controlled cost.",
                        ),
                        option(
                            "organic_social",
                            "Rely on organic social posts",
                            0,
                            10,
                            "Cheap, but the buyer doubts it will move units off the shelf.",
                        ),
                    ],
                },
                DecisionStep {
                    key: "retail_partner".to_string(),
                    prompt: "Which retail footprint do you propose for the first quarter?".to_string(),
                    options: vec![
                        option(
                            "national_chain",
                            "Exclusive national chain rollout",
                            6_000,
                            15,
                            "Broad coverage, but slotting fees eat into the launch budget.",
                        ),
                        option(
                            "regional_boutiques",
                            "Curated regional boutiques",
                            3_000,
                            25,
                            "The buyer values the premium placement and manageable inventory risk.",
                        ),
                        option(
                            "online_only",
                            "Online store only",
                            0,
                            12,
                            "Low cost, though the buyer loses the in-store try-on experience.",
                        ),
                    ],
                },
                DecisionStep {
                    key: "customer_feedback".to_string(),
                    prompt: "How will you validate demand before scaling inventory?".to_string(),
                    options: vec![
                        option(
                            "paid_beta",
                            "Paid beta with 200 customers",
                            4_000,
                            15,
                            "Rich data, but slow and costly for the buyer's timeline.",
                        ),
                        option(
                            "survey_existing",
                            "Survey existing customers",
                            1_000,
                            20,
                            "Quick signal from the right audience at a low cost.",
                        ),
                        option(
                            "skip_validation",
                            "Skip validation and scale",
                            0,
                            5,
                            "The buyer is uneasy committing shelf space without evidence.",
                        ),
                    ],
                },
                DecisionStep {
                    key: "post_launch".to_string(),
                    prompt: "Sales are 10% under plan after a month. What is your move?".to_string(),
                    options: vec![
                        option(
                            "price_cut",
                            "Cut the price by 20%",
                            2_000,
                            8,
                            "Short-term lift, but it erodes margin and brand positioning.",
                        ),
                        option(
                            "bundle_offer",
                            "Bundle with a premium strap",
                            3_000,
                            15,
                            "Adds perceived value while protecting the list price.",
                        ),
                        option(
                            "feature_update",
                            "Ship the requested battery-saver update",
                            0,
                            20,
                            "Addresses the top review complaint without new spend.",
                        ),
                    ],
                },
            ],
            budget_bonuses: vec![
                BudgetBonus {
                    minimum_remaining: 5_000,
                    bonus: 10,
                },
                BudgetBonus {
                    minimum_remaining: 2_500,
                    bonus: 5,
                },
            ],
        }
    }
}

impl DecisionLoopConfig {
    pub fn step(&self, index: usize) -> Option<&DecisionStep> {
        self.steps.get(index)
    }

    pub fn start(&self) -> DecisionLoopState {
        DecisionLoopState {
            step: 0,
            remaining_budget: self.starting_budget,
            choices: Vec::new(),
        }
    }

    /// Highest bonus whose threshold the remaining budget clears.
    pub fn budget_bonus(&self, remaining_budget: u32) -> u8 {
        self.budget_bonuses
            .iter()
            .filter(|bonus| remaining_budget >= bonus.minimum_remaining)
            .map(|bonus| bonus.bonus)
            .max()
            .unwrap_or(0)
    }

    /// Best achievable table total plus the largest bonus.
    pub fn max_score(&self) -> u32 {
        let table: u32 = self
            .steps
            .iter()
            .map(|step| u32::from(step.best_score()))
            .sum();
        let bonus = self
            .budget_bonuses
            .iter()
            .map(|bonus| u32::from(bonus.bonus))
            .max()
            .unwrap_or(0);
        table + bonus
    }

    pub(crate) fn validate(&self) -> Result<(), RubricError> {
        if self.steps.is_empty() || self.steps.iter().any(|step| step.options.is_empty()) {
            return Err(RubricError::EmptyDecisionLoop);
        }
        for step in &self.steps {
            let mut ids = BTreeSet::new();
            for option in &step.options {
                if !ids.insert(option.id.as_str()) {
                    return Err(RubricError::DuplicateOption(option.id.clone()));
                }
            }
        }
        Ok(())
    }
}

/// One recorded choice and the table entry it earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub step_key: String,
    pub option_id: String,
    pub cost: u32,
    pub score: u8,
    pub feedback: String,
    pub remaining_budget: u32,
}

/// Persisted per-task state of the decision loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionLoopState {
    pub step: usize,
    pub remaining_budget: u32,
    pub choices: Vec<DecisionRecord>,
}

impl DecisionLoopState {
    pub fn is_complete(&self, config: &DecisionLoopConfig) -> bool {
        self.step >= config.steps.len()
    }

    /// Applies the chosen option of the current step and advances.
    pub fn apply(
        &mut self,
        option_id: &str,
        config: &DecisionLoopConfig,
    ) -> Result<DecisionRecord, DecisionError> {
        let step = config
            .step(self.step)
            .ok_or(DecisionError::AlreadyComplete)?;
        let option = step
            .option(option_id)
            .ok_or_else(|| DecisionError::UnknownOption {
                step: step.key.clone(),
                option: option_id.to_string(),
            })?;

        let remaining_budget = self.remaining_budget.checked_sub(option.cost).ok_or(
            DecisionError::InsufficientBudget {
                option: option.id.clone(),
                cost: option.cost,
                remaining: self.remaining_budget,
            },
        )?;

        let record = DecisionRecord {
            step_key: step.key.clone(),
            option_id: option.id.clone(),
            cost: option.cost,
            score: option.score,
            feedback: option.feedback.clone(),
            remaining_budget,
        };
        self.remaining_budget = remaining_budget;
        self.step += 1;
        self.choices.push(record.clone());

        Ok(record)
    }

    pub fn table_score(&self) -> u32 {
        self.choices
            .iter()
            .map(|choice| u32::from(choice.score))
            .sum()
    }

    /// Table score plus budget bonus, clamped to 100. The bonus only applies once every step is answered.
    pub fn score(&self, config: &DecisionLoopConfig) -> u8 {
        let bonus = if self.is_complete(config) {
            u32::from(config.budget_bonus(self.remaining_budget))
        } else {
            0
        };
        (self.table_score() + bonus).min(100) as u8
    }
}

/// Invalid moves in the decision loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    #[error("option '{option}' is not available at step '{step}'")]
    UnknownOption { step: String, option: String },
    #[error("option '{option}' costs {cost} but only {remaining} budget remains")]
    InsufficientBudget {
        option: String,
        cost: u32,
        remaining: u32,
    },
    #[error("every decision step has already been answered")]
    AlreadyComplete,
}

/// Scores a decision-loop state as a regular validation result.
pub fn evaluate_state(
    state: &DecisionLoopState,
    config: &DecisionLoopConfig,
    feedback: &FeedbackThresholds,
    mut warnings: Vec<String>,
) -> ValidationResult {
    let score = state.score(config);
    let mut breakdown = BTreeMap::new();
    for choice in &state.choices {
        breakdown.insert(choice.step_key.clone(), f32::from(choice.score));
    }
    let bonus = if state.is_complete(config) {
        config.budget_bonus(state.remaining_budget)
    } else {
        0
    };
    breakdown.insert("budget_bonus".to_string(), f32::from(bonus));
    breakdown.insert(
        "remaining_budget".to_string(),
        state.remaining_budget as f32,
    );

    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    for choice in &state.choices {
        let Some(step) = config.steps.iter().find(|step| step.key == choice.step_key) else {
            continue;
        };
        let best = step.best_score();
        if best > 0 && f32::from(choice.score) >= feedback.strength_ratio * f32::from(best) {
            strengths.push(choice.feedback.clone());
        } else if f32::from(choice.score) < feedback.improvement_ratio * f32::from(best) {
            improvements.push(choice.feedback.clone());
        }
    }
    if bonus > 0 {
        strengths.push(format!(
            "Finished with {} of {} budget remaining",
            state.remaining_budget, config.starting_budget
        ));
    }

    let unanswered = config.steps.len().saturating_sub(state.step);
    if unanswered > 0 {
        warnings.push(format!("{unanswered} decision step(s) left unanswered"));
        improvements.insert(0, "Work through every decision before submitting".to_string());
    }

    strengths.truncate(feedback.max_items);
    improvements.truncate(feedback.max_items);
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

/// Replays option ids in step order from the starting budget. Invalid choices are
/// skipped with a warning instead of failing the submission.
pub fn replay(
    choices: &[String],
    config: &DecisionLoopConfig,
) -> (DecisionLoopState, Vec<String>) {
    let mut state = config.start();
    let mut warnings = Vec::new();
    for option_id in choices {
        if state.is_complete(config) {
            warnings.push(format!("ignored extra choice '{option_id}'"));
            continue;
        }
        if let Err(err) = state.apply(option_id, config) {
            warnings.push(err.to_string());
        }
    }
    (state, warnings)
}
