use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use worksim::scoring::{
    DecisionLoopState, ProgressRecord, RepositoryError, RubricConfig, ScoringRepository,
    SessionKey, SubmissionRecord, TaskId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) rubric: Arc<RubricConfig>,
}

type SessionTask = (SessionKey, TaskId);

/// Process-local storage for demos and single-node deployments.
#[derive(Default, Clone)]
pub(crate) struct InMemoryScoringRepository {
    submissions: Arc<Mutex<HashMap<SessionTask, SubmissionRecord>>>,
    progress: Arc<Mutex<HashMap<SessionKey, ProgressRecord>>>,
    decisions: Arc<Mutex<HashMap<SessionTask, DecisionLoopState>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

impl ScoringRepository for InMemoryScoringRepository {
    fn save_submission(
        &self,
        session: &SessionKey,
        record: SubmissionRecord,
    ) -> Result<(), RepositoryError> {
        let key = (session.clone(), record.submission.task_id.clone());
        lock(&self.submissions)?.insert(key, record);
        Ok(())
    }

    fn submission(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
    ) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = lock(&self.submissions)?;
        Ok(guard.get(&(session.clone(), task_id.clone())).cloned())
    }

    fn submissions(&self, session: &SessionKey) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = lock(&self.submissions)?;
        let mut records: Vec<SubmissionRecord> = guard
            .iter()
            .filter(|((key, _), _)| key == session)
            .map(|(_, record)| record.clone())
            .collect();
        records.sort_by(|a, b| a.submission.task_id.cmp(&b.submission.task_id));
        Ok(records)
    }

    fn fetch_progress(
        &self,
        session: &SessionKey,
    ) -> Result<Option<ProgressRecord>, RepositoryError> {
        Ok(lock(&self.progress)?.get(session).cloned())
    }

    fn save_progress(
        &self,
        session: &SessionKey,
        progress: ProgressRecord,
    ) -> Result<(), RepositoryError> {
        lock(&self.progress)?.insert(session.clone(), progress);
        Ok(())
    }

    fn fetch_decision_state(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
    ) -> Result<Option<DecisionLoopState>, RepositoryError> {
        let guard = lock(&self.decisions)?;
        Ok(guard.get(&(session.clone(), task_id.clone())).cloned())
    }

    fn save_decision_state(
        &self,
        session: &SessionKey,
        task_id: &TaskId,
        state: DecisionLoopState,
    ) -> Result<(), RepositoryError> {
        lock(&self.decisions)?.insert((session.clone(), task_id.clone()), state);
        Ok(())
    }
}
