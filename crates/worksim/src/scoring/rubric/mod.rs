//! Static rubric tables: task catalog, skill mapping, criterion weights, keyword
//! lists and feedback thresholds. Loaded once and passed by reference into the
//! scoring functions.

mod tasks;

pub use tasks::{
    CompetitiveAnalysisRubric, CompetitiveAnalysisWeights, CriterionWeights,
    CustomerResearchRubric, CustomerResearchWeights, FallbackRubric, FallbackWeights,
    FeaturePrioritizationRubric, FeaturePrioritizationWeights, GoToMarketRubric, GoToMarketWeights, LaunchMetricsRubric,
    LaunchMetricsWeights, PricingStrategyRubric, PricingStrategyWeights,
};

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::decision::DecisionLoopConfig;
use super::domain::TaskId;
use super::validators::MAX_POINTS;

const WEIGHT_TOLERANCE: f32 = 0.001;

/// One entry of the simulation's task catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: TaskId,
    pub title: String,
    /// Validator name resolved through `ValidatorKind::from_name`.
    pub validator: String,
    /// Share of the final score, in percent.
    pub weight: u8,
    #[serde(default = "required_default")]
    pub required: bool,
}

fn required_default() -> bool {
    true
}

/// Thresholds and boilerplate used when turning sub-scores into feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackThresholds {
    /// Sub-scores at or above this share of the maximum produce a strength.
    pub strength_ratio: f32,
    /// Sub-scores below this share of the maximum produce an improvement.
    pub improvement_ratio: f32,
    pub max_items: usize,
    pub fallback_strength: String,
    pub fallback_improvement: String,
    pub default_score: u8,
    pub default_improvement: String,
}

impl Default for FeedbackThresholds {
    fn default() -> Self {
        Self {
            strength_ratio: 0.8,
            improvement_ratio: 0.6,
            max_items: 3,
            fallback_strength: "Completed the task".to_string(),
            fallback_improvement: "Continue practicing to deepen your analysis".to_string(),
            default_score: 50,
            default_improvement: "Review the task instructions and resubmit".to_string(),
        }
    }
}

/// Per-task criterion tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaTables {
    pub customer_research: CustomerResearchRubric,
    pub competitive_analysis: CompetitiveAnalysisRubric,
    pub feature_prioritization: FeaturePrioritizationRubric,
    pub go_to_market: GoToMarketRubric,
    pub pricing_strategy: PricingStrategyRubric,
    pub launch_metrics: LaunchMetricsRubric,
    pub fallback: FallbackRubric,
}

/// Everything the engine needs to score a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RubricConfig {
    pub tasks: Vec<TaskDefinition>,
    pub skills: BTreeMap<String, Vec<TaskId>>,
    pub feedback: FeedbackThresholds,
    pub criteria: CriteriaTables,
    pub decision_loop: DecisionLoopConfig,
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl RubricConfig {
    /// Built-in product launch simulation.
    pub fn standard() -> Self {
        let tasks = [
            ("task1", "Customer research", "customer_research", 15),
            ("task2", "Competitive analysis", "competitive_analysis", 15),
            ("task3", "Feature prioritization", "feature_prioritization", 15),
            ("task4", "Go-to-market plan", "go_to_market", 15),
            ("task5", "Pricing strategy", "pricing_strategy", 15),
            ("task6", "Launch metrics review", "launch_metrics", 15),
            ("task7", "Retail buyer negotiation", "stakeholder_persona", 10),
        ]
        .into_iter()
        .map(|(id, title, validator, weight)| TaskDefinition {
            id: TaskId::new(id),
            title: title.to_string(),
            validator: validator.to_string(),
            weight,
            required: true,
        })
        .collect();

        let mut skills = BTreeMap::new();
        skills.insert("Data Insights".to_string(), task_ids(&["task1", "task6"]));
        skills.insert(
            "Strategic Thinking".to_string(),
            task_ids(&["task2", "task3", "task5"]),
        );
        skills.insert("Communication".to_string(), task_ids(&["task4", "task7"]));
        skills.insert(
            "Commercial Acumen".to_string(),
            task_ids(&["task5", "task7"]),
        );

        Self {
            tasks,
            skills,
            feedback: FeedbackThresholds::default(),
            criteria: CriteriaTables::default(),
            decision_loop: DecisionLoopConfig::default(),
        }
    }

    /// Reads a JSON rubric; omitted sections keep their built-in values.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RubricError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RubricError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&raw).map_err(|source| RubricError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a rubric document without validating it. A document that replaces
    /// `tasks` but omits `skills` starts from an empty skill map, since the
    /// built-in skills only reference built-in tasks.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut document: serde_json::Value = serde_json::from_str(raw)?;
        if let Some(sections) = document.as_object_mut() {
            if sections.contains_key("tasks") && !sections.contains_key("skills") {
                sections.insert(
                    "skills".to_string(),
                    serde_json::Value::Object(serde_json::Map::new()),
                );
            }
        }
        serde_json::from_value(document)
    }

    pub fn task(&self, id: &TaskId) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn required_tasks(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.iter().filter(|task| task.required)
    }

    /// Rejects tables that would silently skew scores.
    pub fn validate(&self) -> Result<(), RubricError> {
        let mut seen = BTreeSet::new();
        for task in &self.tasks {
            if !seen.insert(&task.id) {
                return Err(RubricError::DuplicateTask(task.id.clone()));
            }
        }

        let total: u32 = self.tasks.iter().map(|task| u32::from(task.weight)).sum();
        if !self.tasks.is_empty() && total != 100 {
            return Err(RubricError::TaskWeights { total });
        }

        for (skill, task_ids) in &self.skills {
            if let Some(unknown) = task_ids.iter().find(|id| self.task(id).is_none()) {
                return Err(RubricError::UnknownSkillTask {
                    skill: skill.clone(),
                    task: unknown.clone(),
                });
            }
        }

        let criteria = &self.criteria;
        let tables: [(&'static str, f32); 7] = [
            (
                "customer_research",
                criteria.customer_research.weights.total(),
            ),
            (
                "competitive_analysis",
                criteria.competitive_analysis.weights.total(),
            ),
            (
                "feature_prioritization",
                criteria.feature_prioritization.weights.total(),
            ),
            ("go_to_market", criteria.go_to_market.weights.total()),
            ("pricing_strategy", criteria.pricing_strategy.weights.total()),
            ("launch_metrics", criteria.launch_metrics.weights.total()),
            ("fallback", criteria.fallback.weights.total()),
        ];
        for (rubric, total) in tables {
            if (total - 1.0).abs() > WEIGHT_TOLERANCE {
                return Err(RubricError::CriterionWeights { rubric, total });
            }
        }

        let partial_credits = [
            ("short_persona_credit", criteria.customer_research.short_persona_credit, 1.0),
            (
                "unknown_framework_points",
                criteria.feature_prioritization.unknown_framework_points,
                MAX_POINTS,
            ),
            (
                "overscoped_points",
                criteria.feature_prioritization.overscoped_points,
                MAX_POINTS,
            ),
            ("short_message_points", criteria.go_to_market.short_message_points, MAX_POINTS),
            ("long_message_points", criteria.go_to_market.long_message_points, MAX_POINTS),
            ("unknown_model_points", criteria.pricing_strategy.unknown_model_points, MAX_POINTS),
            (
                "unreadable_price_points",
                criteria.pricing_strategy.unreadable_price_points,
                MAX_POINTS,
            ),
            (
                "out_of_range_price_points",
                criteria.pricing_strategy.out_of_range_price_points,
                MAX_POINTS,
            ),
            (
                "short_recommendation_credit",
                criteria.launch_metrics.short_recommendation_credit,
                1.0,
            ),
        ];
        for (field, value, max) in partial_credits {
            if !(0.0..=max).contains(&value) {
                return Err(RubricError::PartialCredit { field, value, max });
            }
        }

        let feedback = &self.feedback;
        let ratios_valid = (0.0..=1.0).contains(&feedback.strength_ratio)
            && (0.0..=1.0).contains(&feedback.improvement_ratio)
            && feedback.improvement_ratio <= feedback.strength_ratio;
        if !ratios_valid || feedback.default_score > 100 {
            return Err(RubricError::Thresholds);
        }

        self.decision_loop.validate()?;
        Ok(())
    }
}

fn task_ids(ids: &[&str]) -> Vec<TaskId> {
    ids.iter().map(|id| TaskId::new(*id)).collect()
}

/// Rubric loading and consistency failures.
#[derive(Debug, thiserror::Error)]
pub enum RubricError {
    #[error("unable to read rubric file {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("rubric file {} is not valid JSON", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("task {0} is defined more than once")]
    DuplicateTask(TaskId),
    #[error("task weights must sum to 100, got {total}")]
    TaskWeights { total: u32 },
    #[error("skill '{skill}' references unknown task {task}")]
    UnknownSkillTask { skill: String, task: TaskId },
    #[error("criterion weights for {rubric} must sum to 1.0, got {total:.3}")]
    CriterionWeights { rubric: &'static str, total: f32 },
    #[error("{field} must lie in [0, {max}], got {value}")]
    PartialCredit {
        field: &'static str,
        value: f32,
        max: f32,
    },
    #[error("feedback thresholds must be ratios in [0, 1] with improvement <= strength")]
    Thresholds,
    #[error("decision loop must define at least one step with options")]
    EmptyDecisionLoop,
    #[error("decision loop option '{0}' is defined more than once")]
    DuplicateOption(String),
}
