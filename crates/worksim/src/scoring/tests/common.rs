use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::scoring::decision::DecisionLoopState;
use crate::scoring::domain::{SessionKey, SubmissionRecord, TaskId, TaskSubmission, ValidationResult};
use crate::scoring::grader::{AssistedGrader, GraderError};
use crate::scoring::progress::ProgressRecord;
use crate::scoring::repository::{RepositoryError, ScoringRepository};
use crate::scoring::rubric::{RubricConfig, TaskDefinition};
use crate::scoring::{scoring_router, NoGrader, SimulationScoringService};

pub(super) fn session() -> SessionKey {
    SessionKey::new("user-42", "smartwatch-launch", "session-1")
}

pub(super) fn customer_research() -> TaskSubmission {
    TaskSubmission::new("task1")
        .with_field(
            "problem_statement",
            "Runners abandon fitness watches within three months because the battery dies \
             mid-week, the strap causes discomfort on long runs and the price feels high for \
             what is mostly step counting. Health insights are shallow and the design looks \
             like gym equipment rather than something worn all day.",
        )
        .with_field(
            "target_persona",
            "Maya, 34, marathon hobbyist who trains five mornings a week before work",
        )
        .with_selection(
            "pain_points",
            ["Battery anxiety", "Durability in rain", "Comfort on long runs"],
        )
}

pub(super) fn competitive_analysis() -> TaskSubmission {
    TaskSubmission::new("task2")
        .with_selection("competitors", ["Garmin", "Apple", "Fitbit", "Whoop"])
        .with_field(
            "differentiation",
            "Two-week battery life, a lighter design, and a price under the premium \
             ecosystem players, plus clinically validated health metrics and a two-year \
             warranty that none of the others match.",
        )
        .with_field(
            "positioning_statement",
            "For endurance runners who are tired of charging, our watch is the training \
             partner that lasts the whole block, unlike smartwatches that die mid-week.",
        )
}

pub(super) fn feature_prioritization() -> TaskSubmission {
    TaskSubmission::new("task3")
        .with_selection("framework", ["RICE"])
        .with_selection(
            "must_have",
            ["Two-week battery", "GPS pace alerts", "Recovery score"],
        )
        .with_field(
            "rationale",
            "Customer interviews rank battery first; RICE puts GPS alerts highest for impact \
             against effort, recovery score is backed by usage data from the beta, and \
             cutting sleep coaching lowers delivery risk without hurting launch revenue.",
        )
}

pub(super) fn go_to_market() -> TaskSubmission {
    TaskSubmission::new("task4")
        .with_selection("channels", ["Social", "Email", "Retail"])
        .with_field("key_message", "A week of battery, a lifetime of runs.")
        .with_field(
            "launch_plan",
            "Six-week timeline: teaser social posts and an influencer seeding wave with \
             running coaches, email waitlist nurture with early-bird codes, a retail \
             partnership with specialist running stores, a launch-day livestream, and a \
             post-launch review of sell-through by channel in week eight.",
        )
}

pub(super) fn pricing_strategy() -> TaskSubmission {
    TaskSubmission::new("task5")
        .with_selection("pricing_model", ["value_based"])
        .with_field("price_point", "$349")
        .with_field(
            "justification",
            "Runners value battery life enough to pay above Fitbit; at $349 we keep a 48% \
             margin over unit cost, undercut the main competitor by $50, and the target \
             segment showed low price elasticity in the survey between $299 and $379.",
        )
}

pub(super) fn launch_metrics() -> TaskSubmission {
    TaskSubmission::new("task6")
        .with_selection("kpis", ["30-day retention", "Churn", "NPS"])
        .with_field(
            "insight",
            "Retention drops to 61% by day 30 while churn spikes among users who never \
             enable sleep tracking; conversion from trial is healthy, engagement with \
             coaching is low, revenue per user is on plan and NPS sits at 34.",
        )
        .with_field(
            "recommendation",
            "Prompt sleep tracking during onboarding and A/B test a coaching nudge in week two.",
        )
}

/// Best path through the default decision table: 25 + 25 + 20 + 20 + 10 bonus.
pub(super) fn best_decisions() -> [&'static str; 4] {
    [
        "influencer_campaign",
        "regional_boutiques",
        "survey_existing",
        "feature_update",
    ]
}

pub(super) fn stakeholder_persona() -> TaskSubmission {
    TaskSubmission::new("task7").with_selection("choices", best_decisions())
}

pub(super) fn full_session() -> Vec<TaskSubmission> {
    vec![
        customer_research(),
        competitive_analysis(),
        feature_prioritization(),
        go_to_market(),
        pricing_strategy(),
        launch_metrics(),
        stakeholder_persona(),
    ]
}

pub(super) fn build_service() -> (
    SimulationScoringService<MemoryRepository, NoGrader>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = SimulationScoringService::new(repository.clone(), RubricConfig::standard());
    (service, repository)
}

pub(super) fn router_with_service(
    service: SimulationScoringService<MemoryRepository, NoGrader>,
) -> axum::Router {
    scoring_router(Arc::new(service))
}

type SessionTask = (SessionKey, TaskId);

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    submissions: Arc<Mutex<BTreeMap<SessionTask, SubmissionRecord>>>,
    progress: Arc<Mutex<HashMap<SessionKey, ProgressRecord>>>,
    decisions: Arc<Mutex<HashMap<SessionTask, DecisionLoopState>>>,
}

impl MemoryRepository {
    pub(super) fn submission_count(&self) -> usize {
        self.submissions.lock().expect("repository mutex poisoned").len()
    }
}

impl ScoringRepository for MemoryRepository {
    fn save_submission(
        &self,
        session: &SessionKey,
        record: SubmissionRecord,
    ) -> Result<(), RepositoryError> {
        let key = (session.clone(), record.submission.task_id.clone());
        self.submissions
            .lock()
            .expect("repository mutex poisoned")
            .insert(key, record);
        Ok(())
    }

    fn submission(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.submissions.lock().expect("repository mutex poisoned");
        Ok(guard.get(&(session.clone(), task_id.clone())).cloned())
    }

    fn submissions(&self, session: &SessionKey) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.submissions.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|((key, _), _)| key == session)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn fetch_progress(
        &self,
        session: &SessionKey,
    ) -> Result<Option<ProgressRecord>, RepositoryError> {
        let guard = self.progress.lock().expect("repository mutex poisoned");
        Ok(guard.get(session).cloned())
    }

    fn save_progress(
        &self,
        session: &SessionKey,
        progress: ProgressRecord,
    ) -> Result<(), RepositoryError> {
        self.progress
            .lock()
            .expect("repository mutex poisoned")
            .insert(session.clone(), progress);
        Ok(())
    }

    fn fetch_decision_state(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
    ) -> Result<Option<DecisionLoopState>, RepositoryError> {
        let guard = self.decisions.lock().expect("repository mutex poisoned");
        Ok(guard.get(&(session.clone(), task_id.clone())).cloned())
    }

    fn save_decision_state(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
        state: DecisionLoopState,
    ) -> Result<(), RepositoryError> {
        self.decisions
            .lock()
            .expect("repository mutex poisoned")
            .insert((session.clone(), task_id.clone()), state);
        Ok(())
    }
}

/// Holds the first `parties` progress reads until all of them have arrived, so
/// concurrent submitters all read progress before any of them writes it.
pub(super) struct RendezvousRepository {
    inner: MemoryRepository,
    barrier: Barrier,
    parties: usize,
    arrivals: AtomicUsize,
}

impl RendezvousRepository {
    pub(super) fn new(parties: usize) -> Self {
        Self {
            inner: MemoryRepository::default(),
            barrier: Barrier::new(parties),
            parties,
            arrivals: AtomicUsize::new(0),
        }
    }
}

impl ScoringRepository for RendezvousRepository {
    fn save_submission(
        &self,
        session: &SessionKey,
        record: SubmissionRecord,
    ) -> Result<(), RepositoryError> {
        self.inner.save_submission(session, record)
    }

    fn submission(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError> {
        self.inner.submission(session, task_id)
    }

    fn submissions(&self, session: &SessionKey) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        self.inner.submissions(session)
    }

    fn fetch_progress(
        &self,
        session: &SessionKey,
    ) -> Result<Option<ProgressRecord>, RepositoryError> {
        let progress = self.inner.fetch_progress(session);
        if self.arrivals.fetch_add(1, Ordering::SeqCst) < self.parties {
            self.barrier.wait();
        }
        progress
    }

    fn save_progress(
        &self,
        session: &SessionKey,
        progress: ProgressRecord,
    ) -> Result<(), RepositoryError> {
        self.inner.save_progress(session, progress)
    }

    fn fetch_decision_state(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
    ) -> Result<Option<DecisionLoopState>, RepositoryError> {
        self.inner.fetch_decision_state(session, task_id)
    }

    fn save_decision_state(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
        state: DecisionLoopState,
    ) -> Result<(), RepositoryError> {
        self.inner.save_decision_state(session, task_id, state)
    }
}

pub(super) struct UnavailableRepository;

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("database offline".to_string())
}

impl ScoringRepository for UnavailableRepository {
    fn save_submission(&self, _: &SessionKey, _: SubmissionRecord) -> Result<(), RepositoryError> {
        Err(offline())
    }

    fn submission(
        &self,
        _: &SessionKey,
        _: &TaskId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(offline())
    }

    fn submissions(&self, _: &SessionKey) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(offline())
    }

    fn fetch_progress(&self, _: &SessionKey) -> Result<Option<ProgressRecord>, RepositoryError> {
        Err(offline())
    }

    fn save_progress(&self, _: &SessionKey, _: ProgressRecord) -> Result<(), RepositoryError> {
        Err(offline())
    }

    fn fetch_decision_state(
        &self,
        _: &SessionKey,
        _: &TaskId,
    ) -> Result<Option<DecisionLoopState>, RepositoryError> {
        Err(offline())
    }

    fn save_decision_state(
        &self,
        _: &SessionKey,
        _: &TaskId,
        _: DecisionLoopState,
    ) -> Result<(), RepositoryError> {
        Err(offline())
    }
}

/// Grader double returning a fixed result or a fixed failure, counting calls.
#[derive(Default)]
pub(super) struct StubGrader {
    score: Option<u8>,
    calls: Mutex<Vec<TaskId>>,
}

impl StubGrader {
    pub(super) fn scoring(score: u8) -> Self {
        Self {
            score: Some(score),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing() -> Self {
        Self::default()
    }

    pub(super) fn calls(&self) -> Vec<TaskId> {
        self.calls.lock().expect("grader mutex poisoned").clone()
    }
}

impl AssistedGrader for StubGrader {
    fn grade(
        &self,
        task: &TaskDefinition,
        _submission: &TaskSubmission,
    ) -> Result<ValidationResult, GraderError> {
        self.calls
            .lock()
            .expect("grader mutex poisoned")
            .push(task.id.clone());
        match self.score {
            Some(score) => Ok(ValidationResult {
                score,
                breakdown: BTreeMap::new(),
                strengths: vec!["Graded by reviewer model".to_string()],
                improvements: Vec::new(),
                warnings: Vec::new(),
            }),
            None => Err(GraderError::Unavailable("rate limited".to_string())),
        }
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
