//! Loading rubric overrides from disk.

use std::path::PathBuf;

use serde_json::json;
use worksim::scoring::{score_submission, RubricConfig, RubricError, TaskSubmission};

fn write_rubric(name: &str, body: serde_json::Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "worksim-{name}-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, body.to_string()).expect("write rubric file");
    path
}

#[test]
fn partial_override_keeps_builtin_sections() {
    let path = write_rubric(
        "feedback",
        json!({
            "feedback": { "default_score": 40 }
        }),
    );

    let rubric = RubricConfig::from_path(&path).expect("rubric loads");
    assert_eq!(rubric.tasks.len(), 7);
    assert_eq!(rubric.feedback.default_score, 40);
    assert_eq!(rubric.feedback.fallback_strength, "Completed the task");

    let result = score_submission(&TaskSubmission::new("unlisted"), &rubric).result;
    assert_eq!(result.score, 40);

    std::fs::remove_file(path).ok();
}

#[test]
fn unbalanced_task_weights_are_rejected() {
    let path = write_rubric(
        "weights",
        json!({
            "tasks": [
                { "id": "task1", "title": "Research", "validator": "customer_research", "weight": 60 },
                { "id": "task2", "title": "Competition", "validator": "competitive_analysis", "weight": 30 }
            ],
            "skills": {}
        }),
    );

    match RubricConfig::from_path(&path) {
        Err(RubricError::TaskWeights { total }) => assert_eq!(total, 90),
        other => panic!("expected weight error, got {other:?}"),
    }

    std::fs::remove_file(path).ok();
}

#[test]
fn custom_catalog_file_needs_no_skill_section() {
    let path = write_rubric(
        "catalog",
        json!({
            "tasks": [
                { "id": "intro", "title": "Research", "validator": "customer_research", "weight": 40 },
                { "id": "wrap-up", "title": "Metrics", "validator": "launch_metrics", "weight": 60 }
            ]
        }),
    );

    let rubric = RubricConfig::from_path(&path).expect("custom catalog loads");
    assert_eq!(rubric.tasks.len(), 2);
    assert!(rubric.skills.is_empty());

    std::fs::remove_file(path).ok();
}

#[test]
fn missing_file_reports_path() {
    let error = RubricConfig::from_path("/nonexistent/worksim-rubric.json")
        .expect_err("file does not exist");
    assert!(error.to_string().contains("worksim-rubric.json"));
}
