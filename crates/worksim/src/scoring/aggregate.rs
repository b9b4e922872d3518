use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::domain::TaskId;
use super::rubric::{RubricConfig, TaskDefinition};

/// Latest score per task.
pub type TaskScores = BTreeMap<TaskId, u8>;

/// Weighted mean of task scores over the catalog. Tasks without a result count as 0.
pub fn final_score(results: &TaskScores, catalog: &[TaskDefinition]) -> u8 {
    let total_weight: f64 = catalog.iter().map(|task| f64::from(task.weight)).sum();
    if total_weight <= 0.0 {
        return 0;
    }

    let weighted: f64 = catalog
        .iter()
        .map(|task| {
            let score = results.get(&task.id).copied().unwrap_or(0).min(100);
            f64::from(score) * f64::from(task.weight)
        })
        .sum();

    (weighted / total_weight).round().clamp(0.0, 100.0) as u8
}

/// Per-skill averages. A task mapped to `k` skills contributes to each with
/// weight `1/k`; skills without tasks score 0.
pub fn skill_breakdown(
    results: &TaskScores,
    skills: &BTreeMap<String, Vec<TaskId>>,
) -> BTreeMap<String, u8> {
    let mut fan_out: HashMap<&TaskId, usize> = HashMap::new();
    for task_id in skills.values().flatten() {
        *fan_out.entry(task_id).or_default() += 1;
    }

    skills
        .iter()
        .map(|(skill, task_ids)| {
            let (weighted, weights) = task_ids.iter().fold((0.0_f64, 0.0_f64), |acc, task_id| {
                let share = 1.0 / fan_out.get(task_id).copied().unwrap_or(1).max(1) as f64;
                let score = f64::from(results.get(task_id).copied().unwrap_or(0).min(100));
                (acc.0 + score * share, acc.1 + share)
            });
            let value = if weights > 0.0 {
                (weighted / weights).round().clamp(0.0, 100.0) as u8
            } else {
                0
            };
            (skill.clone(), value)
        })
        .collect()
}

/// Simulation-level summary shown on the results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalReport {
    pub final_score: u8,
    pub skill_breakdown: BTreeMap<String, u8>,
    pub task_scores: TaskScores,
    /// Required tasks with no result yet; they were counted as 0.
    pub missing_tasks: Vec<TaskId>,
}

impl FinalReport {
    pub fn build(results: &TaskScores, rubric: &RubricConfig) -> Self {
        let missing_tasks = rubric
            .required_tasks()
            .filter(|task| !results.contains_key(&task.id))
            .map(|task| task.id.clone())
            .collect();

        Self {
            final_score: final_score(results, &rubric.tasks),
            skill_breakdown: skill_breakdown(results, &rubric.skills),
            task_scores: results.clone(),
            missing_tasks,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_tasks.is_empty()
    }
}
