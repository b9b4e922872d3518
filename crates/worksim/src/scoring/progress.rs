use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::{final_score, skill_breakdown, TaskScores};
use super::domain::TaskId;
use super::rubric::{RubricConfig, TaskDefinition};

/// Learner progress through one simulation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub completed_task_ids: BTreeSet<TaskId>,
    pub percentage: u8,
    pub final_score: Option<u8>,
    pub skill_breakdown: Option<BTreeMap<String, u8>>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    pub fn start(at: DateTime<Utc>) -> Self {
        Self {
            completed_task_ids: BTreeSet::new(),
            percentage: 0,
            final_score: None,
            skill_breakdown: None,
            started_at: at,
            updated_at: at,
            completed_at: None,
        }
    }

    /// Brings the completed set in line with the stored results and refreshes the
    /// percentage. The completed set only grows; replaying the same results is a no-op
    /// apart from the timestamp.
    pub fn record_results(&mut self, results: &TaskScores, catalog: &[TaskDefinition]) {
        self.completed_task_ids.extend(results.keys().cloned());
        self.percentage = percentage(&self.completed_task_ids, catalog);
        self.updated_at = Utc::now();
    }

    /// Computes final and skill scores once every required task has a result.
    /// Returns `false` and leaves the record untouched otherwise.
    pub fn finalize(&mut self, results: &TaskScores, rubric: &RubricConfig) -> bool {
        let ready = rubric
            .required_tasks()
            .all(|task| results.contains_key(&task.id));
        if !ready {
            return false;
        }

        let now = Utc::now();
        self.final_score = Some(final_score(results, &rubric.tasks));
        self.skill_breakdown = Some(skill_breakdown(results, &rubric.skills));
        self.completed_at.get_or_insert(now);
        self.updated_at = now;
        true
    }

    pub fn is_finalized(&self) -> bool {
        self.final_score.is_some()
    }
}

fn percentage(completed: &BTreeSet<TaskId>, catalog: &[TaskDefinition]) -> u8 {
    let required: Vec<&TaskDefinition> = catalog.iter().filter(|task| task.required).collect();
    if required.is_empty() {
        return 100;
    }
    let done = required
        .iter()
        .filter(|task| completed.contains(&task.id))
        .count();
    ((done as f64 / required.len() as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(&str, u8)]) -> TaskScores {
        entries
            .iter()
            .map(|(id, score)| (TaskId::new(*id), *score))
            .collect()
    }

    #[test]
    fn recording_the_same_results_twice_is_idempotent() {
        let rubric = RubricConfig::standard();
        let mut progress = ProgressRecord::start(Utc::now());
        let results = scores(&[("task1", 70)]);

        progress.record_results(&results, &rubric.tasks);
        progress.record_results(&results, &rubric.tasks);

        assert_eq!(progress.completed_task_ids.len(), 1);
        assert_eq!(progress.percentage, 14);
    }

    #[test]
    fn stale_record_catches_up_with_stored_results() {
        let rubric = RubricConfig::standard();
        let mut progress = ProgressRecord::start(Utc::now());
        progress.record_results(&scores(&[("task1", 70)]), &rubric.tasks);

        progress.record_results(&scores(&[("task1", 70), ("task2", 90)]), &rubric.tasks);

        assert_eq!(progress.completed_task_ids.len(), 2);
        assert_eq!(progress.percentage, 29);
    }

    #[test]
    fn optional_tasks_do_not_count_toward_percentage() {
        let mut rubric = RubricConfig::standard();
        rubric.tasks.truncate(2);
        rubric.tasks[1].required = false;
        let mut progress = ProgressRecord::start(Utc::now());

        progress.record_results(&scores(&[("task1", 60)]), &rubric.tasks);
        assert_eq!(progress.percentage, 100);
    }

    #[test]
    fn finalize_waits_for_every_required_task() {
        let rubric = RubricConfig::standard();
        let mut progress = ProgressRecord::start(Utc::now());
        let mut results = TaskScores::new();
        results.insert(TaskId::new("task1"), 80);

        assert!(!progress.finalize(&results, &rubric));
        assert_eq!(progress.final_score, None);
        assert!(progress.completed_at.is_none());

        for task in &rubric.tasks {
            results.insert(task.id.clone(), 80);
        }
        assert!(progress.finalize(&results, &rubric));
        assert_eq!(progress.final_score, Some(80));
        let skills = progress.skill_breakdown.as_ref().expect("skills computed");
        assert_eq!(skills.get("Communication"), Some(&80));
        assert!(progress.completed_at.is_some());
    }
}
