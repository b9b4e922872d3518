use crate::infra::InMemoryScoringRepository;
use clap::Args;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use worksim::error::AppError;
use worksim::scoring::{
    score_submission, FinalReport, RubricConfig, SessionKey, SimulationScoringService, TaskId,
    TaskSubmission, ValidationResult,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Task id to score the submission as (e.g. task3)
    #[arg(long)]
    pub(crate) task: String,
    /// JSON file with `fields` and `selections` objects
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Optional rubric JSON; defaults to the built-in product launch rubric
    #[arg(long)]
    pub(crate) rubric: Option<PathBuf>,
    /// Print the raw result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional rubric JSON; defaults to the built-in product launch rubric
    #[arg(long)]
    pub(crate) rubric: Option<PathBuf>,
    /// Take the costly options in the decision loop instead of the budget-conscious ones
    #[arg(long)]
    pub(crate) big_spender: bool,
    /// Print the final report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Default, Deserialize)]
struct SubmissionFile {
    #[serde(default)]
    fields: BTreeMap<String, String>,
    #[serde(default)]
    selections: BTreeMap<String, Vec<String>>,
}

fn load_rubric(path: Option<PathBuf>) -> Result<RubricConfig, AppError> {
    match path {
        Some(path) => Ok(RubricConfig::from_path(path)?),
        None => Ok(RubricConfig::standard()),
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        task,
        file,
        rubric,
        json,
    } = args;

    let rubric = load_rubric(rubric)?;
    let raw = std::fs::read_to_string(&file)?;
    let parsed: SubmissionFile = serde_json::from_str(&raw)?;
    let submission = TaskSubmission {
        task_id: TaskId::new(task),
        fields: parsed.fields,
        selections: parsed.selections,
    };

    let scored = score_submission(&submission, &rubric);
    if json {
        println!("{}", serde_json::to_string_pretty(&scored.result)?);
        return Ok(());
    }

    let title = rubric
        .task(&submission.task_id)
        .map(|task| task.title.as_str())
        .unwrap_or("Unlisted task");
    println!(
        "{} ({}) scored {} via {} scoring",
        title,
        submission.task_id,
        scored.result.score,
        scored.source.label()
    );
    render_result(&scored.result);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        rubric,
        big_spender,
        json,
    } = args;

    let rubric = load_rubric(rubric)?;
    let repository = Arc::new(InMemoryScoringRepository::default());
    let service = SimulationScoringService::new(repository, rubric);
    let session = SessionKey::new("demo-learner", "smartwatch-launch", "demo");

    println!("Workplace simulation demo: smartwatch product launch");
    for submission in demo_submissions() {
        let task_id = submission.task_id.clone();
        let outcome = match service.submit(&session, submission) {
            Ok(outcome) => outcome,
            Err(err) => {
                println!("  Submission for {task_id} failed: {err}");
                return Ok(());
            }
        };
        let title = service
            .rubric()
            .task(&task_id)
            .map(|task| task.title.clone())
            .unwrap_or_else(|| task_id.to_string());
        println!(
            "\n{} -> {} ({}% complete)",
            title, outcome.record.result.score, outcome.progress.percentage
        );
        render_result(&outcome.record.result);
    }

    let negotiation = TaskId::new("task7");
    println!("\nRetail buyer negotiation");
    for option in decision_script(big_spender) {
        match service.decide(&session, &negotiation, option) {
            Ok(outcome) => {
                println!(
                    "- {} -> {} (cost {}, {} budget left)",
                    outcome.decision.step_key,
                    outcome.decision.option_id,
                    outcome.decision.cost,
                    outcome.decision.remaining_budget
                );
                println!("  {}", outcome.decision.feedback);
                if let Some(submission) = outcome.submission {
                    println!(
                        "  Negotiation scored {} ({}% complete)",
                        submission.record.result.score, submission.progress.percentage
                    );
                }
            }
            Err(err) => {
                println!("- {option} rejected: {err}; falling back to the free option");
                let state = match service.decision_state(&session, &negotiation) {
                    Ok(state) => state,
                    Err(err) => {
                        println!("  Decision state unavailable: {err}");
                        return Ok(());
                    }
                };
                let free = service
                    .rubric()
                    .decision_loop
                    .step(state.step)
                    .and_then(|step| step.options.iter().find(|option| option.cost == 0))
                    .map(|option| option.id.clone());
                if let Some(free) = free {
                    if let Err(err) = service.decide(&session, &negotiation, &free) {
                        println!("  {free} rejected: {err}");
                    }
                }
            }
        }
    }

    let report = match service.report(&session) {
        Ok(report) => report,
        Err(err) => {
            println!("Report unavailable: {err}");
            return Ok(());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }
    Ok(())
}

fn render_result(result: &ValidationResult) {
    for (criterion, value) in &result.breakdown {
        println!("  {criterion:<24} {value:>8.2}");
    }
    for strength in &result.strengths {
        println!("  + {strength}");
    }
    for improvement in &result.improvements {
        println!("  - {improvement}");
    }
    for warning in &result.warnings {
        println!("  ! {warning}");
    }
}

fn render_report(report: &FinalReport) {
    println!("\nFinal score: {}", report.final_score);
    println!("Skills:");
    for (skill, score) in &report.skill_breakdown {
        println!("  - {skill}: {score}");
    }
    if !report.missing_tasks.is_empty() {
        let missing: Vec<&str> = report.missing_tasks.iter().map(TaskId::as_str).collect();
        println!("Missing tasks (scored 0): {}", missing.join(", "));
    }
}

fn decision_script(big_spender: bool) -> [&'static str; 4] {
    if big_spender {
        ["flagship_event", "national_chain", "paid_beta", "bundle_offer"]
    } else {
        [
            "influencer_campaign",
            "regional_boutiques",
            "survey_existing",
            "feature_update",
        ]
    }
}

fn demo_submissions() -> Vec<TaskSubmission> {
    vec![
        TaskSubmission::new("task1")
            .with_field(
                "problem_statement",
                "Commuting runners give up on smartwatches because the battery needs charging \
                 every night, the price is hard to justify next to a phone, and the strap causes \
                 discomfort on long runs.",
            )
            .with_field(
                "target_persona",
                "Sam, 29, runs to work three days a week and tracks heart rate zones",
            )
            .with_selection("pain_points", ["Battery life", "Price", "Comfort"]),
        TaskSubmission::new("task2")
            .with_selection("competitors", ["Garmin", "Apple", "Fitbit"])
            .with_field(
                "differentiation",
                "Ten-day battery and a lighter design at a lower price than the premium \
                 ecosystem watches.",
            )
            .with_field(
                "positioning_statement",
                "For runners who hate charging, Stride is the watch that lasts all week.",
            ),
        TaskSubmission::new("task3")
            .with_selection("framework", ["MoSCoW"])
            .with_selection("must_have", ["Battery saver mode", "GPS", "Heart rate zones"])
            .with_field(
                "rationale",
                "Customer interviews point to battery first; GPS has the highest impact for \
                 the effort, and heart rate zones reuse existing data.",
            ),
        TaskSubmission::new("task4")
            .with_selection("channels", ["Social", "Influencers", "Running stores"])
            .with_field("key_message", "Charge on Sunday, run all week.")
            .with_field(
                "launch_plan",
                "Four-week timeline with influencer runs, a social teaser series and a retail \
                 partnership with running stores.",
            ),
        TaskSubmission::new("task5")
            .with_selection("pricing_model", ["penetration"])
            .with_field("price_point", "$229")
            .with_field(
                "justification",
                "Undercuts the main competitor while keeping margin above cost for the \
                 commuter segment.",
            ),
        TaskSubmission::new("task6")
            .with_selection("kpis", ["Retention", "Conversion"])
            .with_field(
                "insight",
                "Retention is strong but conversion from the waitlist lags and churn is \
                 concentrated in week one.",
            )
            .with_field("recommendation", "Add a week-one onboarding streak."),
    ]
}
